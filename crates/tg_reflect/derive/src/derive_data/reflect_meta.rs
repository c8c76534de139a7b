use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, ImplGenerics, Path, TypeGenerics};

use super::{TypeAttributes, TypeParser};

/// Which traits the generic parameters must implement for an `impl` block.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum GenericBounds {
    /// `T: TypePath`
    TypePath,
    /// `T: Reflect + Typed + FromReflect`
    Reflect,
    /// `T: Reflect + Typed + FromReflect + GetTypeMeta`
    GetTypeMeta,
}

/// Everything needed to name a type and its generics in generated code.
pub(crate) struct ReflectMeta<'a> {
    attrs: TypeAttributes,
    type_parser: TypeParser<'a>,
    tg_reflect_path: Path,
}

impl<'a> ReflectMeta<'a> {
    pub fn new(type_parser: TypeParser<'a>, attrs: TypeAttributes) -> Self {
        Self {
            attrs,
            type_parser,
            tg_reflect_path: crate::path::tg_reflect(),
        }
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn type_parser(&self) -> &TypeParser<'a> {
        &self.type_parser
    }

    #[inline]
    pub fn tg_reflect_path(&self) -> &Path {
        &self.tg_reflect_path
    }

    #[inline]
    pub fn generics(&self) -> &'a Generics {
        self.type_parser.generics()
    }

    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        self.type_parser.impl_with_generic()
    }

    #[inline]
    pub fn real_ident(&self) -> TokenStream {
        self.type_parser.real_ident()
    }

    /// Splits the generics for an `impl` block, adding `bounds` to every
    /// type parameter.
    ///
    /// The returned where clause always ends with a comma, so callers may
    /// append predicates.
    pub fn split_generics(
        &self,
        bounds: GenericBounds,
    ) -> (ImplGenerics<'_>, TypeGenerics<'_>, TokenStream) {
        let generics = self.generics();
        let mut generic_where_clause = quote! { where };

        if bounds >= GenericBounds::Reflect && generics.type_params().next().is_some() {
            let any_send_sync_ = crate::path::any_send_sync_();
            generic_where_clause.extend(quote! { Self: #any_send_sync_, });
        } else if generics.lifetimes().next().is_some() {
            generic_where_clause.extend(quote! { Self: 'static, });
        }

        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        // Maintain existing where clause bounds, if any.
        if let Some(where_clause) = where_clause {
            let predicates = where_clause.predicates.iter();
            generic_where_clause.extend(quote! { #(#predicates,)* });
        }

        let bound = self.param_bound(bounds);
        for param in generics.type_params() {
            let ident = &param.ident;
            generic_where_clause.extend(quote! { #ident: #bound, });
        }

        (impl_generics, ty_generics, generic_where_clause)
    }

    fn param_bound(&self, bounds: GenericBounds) -> TokenStream {
        let tg_reflect_path = &self.tg_reflect_path;
        let type_path_ = crate::path::type_path_(tg_reflect_path);
        let reflect_ = crate::path::reflect_(tg_reflect_path);
        let typed_ = crate::path::typed_(tg_reflect_path);
        let from_reflect_ = crate::path::from_reflect_(tg_reflect_path);
        let get_type_meta_ = crate::path::get_type_meta_(tg_reflect_path);

        match bounds {
            GenericBounds::TypePath => quote! { #type_path_ },
            GenericBounds::Reflect => quote! { #reflect_ + #typed_ + #from_reflect_ },
            GenericBounds::GetTypeMeta => {
                quote! { #reflect_ + #typed_ + #from_reflect_ + #get_type_meta_ }
            }
        }
    }
}
