use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{GenericBounds, ReflectStruct};

/// Generate implementation code for `GetTypeMeta`.
///
/// Every reflected field type, the items field included, is registered as a
/// dependency.
pub(crate) fn impl_trait_get_type_meta(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let tg_reflect_path = meta.tg_reflect_path();
    let get_type_meta_ = crate::path::get_type_meta_(tg_reflect_path);
    let type_meta_ = crate::path::type_meta_(tg_reflect_path);
    let from_type_ = crate::path::from_type_(tg_reflect_path);
    let type_registry_ = crate::path::type_registry_(tg_reflect_path);
    let type_trait_shared_ = crate::path::type_trait_shared_(tg_reflect_path);

    let (insert_default, default_bound) = if meta.attrs().default {
        let type_trait_default_ = crate::path::type_trait_default_(tg_reflect_path);
        let bound = if meta.impl_with_generic() {
            quote! { Self: ::core::default::Default, }
        } else {
            TokenStream::new()
        };
        (
            quote! {
                type_meta.insert_trait::<#type_trait_default_>(#from_type_::<Self>::from_type());
            },
            bound,
        )
    } else {
        (TokenStream::new(), TokenStream::new())
    };

    let field_types = info.reflected_fields().map(|field| &field.data.ty);

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) =
        meta.split_generics(GenericBounds::GetTypeMeta);

    quote! {
        impl #impl_generics #get_type_meta_ for #real_ident #ty_generics #where_clause #default_bound {
            fn get_type_meta() -> #type_meta_ {
                let mut type_meta = #type_meta_::of::<Self>();
                #insert_default
                type_meta.insert_trait::<#type_trait_shared_>(#from_type_::<Self>::from_type());
                type_meta
            }

            fn register_dependencies(registry: &mut #type_registry_) {
                #(registry.register::<#field_types>();)*
            }
        }
    }
}
