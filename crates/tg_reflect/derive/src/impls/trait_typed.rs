use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{GenericBounds, ReflectMeta, ReflectStruct};

/// Wraps `generator` in the matching static info cell.
fn static_info_cell(meta: &ReflectMeta, generator: TokenStream) -> TokenStream {
    let tg_reflect_path = meta.tg_reflect_path();
    if meta.impl_with_generic() {
        let cell_ = crate::path::generic_type_info_cell_(tg_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| {
                #generator
            })
        }
    } else {
        let cell_ = crate::path::non_generic_type_info_cell_(tg_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| {
                #generator
            })
        }
    }
}

/// Generate implementation code for `Typed`.
pub(crate) fn impl_trait_typed(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let tg_reflect_path = meta.tg_reflect_path();
    let typed_ = crate::path::typed_(tg_reflect_path);
    let type_info_ = crate::path::type_info_(tg_reflect_path);
    let struct_info_ = crate::path::struct_info_(tg_reflect_path);
    let named_field_ = crate::path::named_field_(tg_reflect_path);

    let fields = info.active_fields().map(|field| {
        let ty = &field.data.ty;
        let name = field.name_lit();
        quote! { #named_field_::new::<#ty>(#name) }
    });

    let with_items = info.items_field().map(|field| {
        let ty = &field.data.ty;
        let name = field.name_lit();
        quote! { .with_items(#named_field_::new::<#ty>(#name)) }
    });

    let generator = quote! {
        #type_info_::Struct(
            #struct_info_::new::<Self>(&[#(#fields),*])
                #with_items
        )
    };

    let body = static_info_cell(meta, generator);

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(GenericBounds::Reflect);

    quote! {
        impl #impl_generics #typed_ for #real_ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}
