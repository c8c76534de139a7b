use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Ident, LitStr};

use crate::derive_data::{GenericBounds, ReflectMeta};

fn static_path_cell(meta: &ReflectMeta, generator: TokenStream) -> TokenStream {
    let path_cell_ = crate::path::generic_type_path_cell_(meta.tg_reflect_path());

    quote! {
        static CELL: #path_cell_ = #path_cell_::new();
        CELL.get_or_insert::<Self>(|| {
            #generator
        })
    }
}

/// `format!("{prefix}Ident<{}, {}>", args...)`
fn format_generic(
    meta: &ReflectMeta,
    prefix: Option<TokenStream>,
    type_ident: &str,
    type_fn: &str,
) -> TokenStream {
    let macro_utils_ = crate::path::macro_utils_(meta.tg_reflect_path());
    let type_path_ = crate::path::type_path_(meta.tg_reflect_path());
    let type_fn = Ident::new(type_fn, Span::call_site());

    let args = meta.type_parser().generic_args(&type_path_, &type_fn);
    let holes = vec!["{}"; args.len()].join(", ");

    match prefix {
        Some(prefix) => {
            let template = LitStr::new(
                &format!("{{}}::{type_ident}<{holes}>"),
                Span::call_site(),
            );
            quote! { #macro_utils_::format!(#template, #prefix, #(#args),*) }
        }
        None => {
            let template = LitStr::new(&format!("{type_ident}<{holes}>"), Span::call_site());
            quote! { #macro_utils_::format!(#template, #(#args),*) }
        }
    }
}

/// Generate implementation codes for `TypePath`.
pub(crate) fn impl_trait_type_path(meta: &ReflectMeta) -> TokenStream {
    let tg_reflect_path = meta.tg_reflect_path();
    let type_path_ = crate::path::type_path_(tg_reflect_path);
    let option_ = crate::path::option_();

    let parser = meta.type_parser();
    let type_ident = parser.type_ident();
    let type_ident_lit = LitStr::new(&type_ident, Span::call_site());
    let module_path = parser.module_path();

    let (type_path, type_name, inline_flag) = if meta.impl_with_generic() {
        (
            static_path_cell(
                meta,
                format_generic(meta, module_path.clone(), &type_ident, "type_path"),
            ),
            static_path_cell(meta, format_generic(meta, None, &type_ident, "type_name")),
            TokenStream::new(),
        )
    } else {
        let type_path = match &module_path {
            Some(module) => quote! { ::core::concat!(#module, "::", #type_ident_lit) },
            None => quote! { #type_ident_lit },
        };
        (type_path, quote! { #type_ident_lit }, quote! { #[inline] })
    };

    let module_path = match module_path {
        Some(module) => quote! { #option_::Some(#module) },
        None => quote! { #option_::None },
    };

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(GenericBounds::TypePath);

    quote! {
        impl #impl_generics #type_path_ for #real_ident #ty_generics #where_clause {
            #inline_flag
            fn type_path() -> &'static str {
                #type_path
            }

            #inline_flag
            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident_lit
            }

            #[inline]
            fn module_path() -> #option_<&'static str> {
                #module_path
            }
        }
    }
}
