use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{GenericBounds, ReflectStruct};

/// Generate implementation code for `Struct`, `Reflect` and `FromReflect`.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let tg_reflect_path = meta.tg_reflect_path();
    let reflect_ = crate::path::reflect_(tg_reflect_path);
    let from_reflect_ = crate::path::from_reflect_(tg_reflect_path);
    let struct_ = crate::path::struct_(tg_reflect_path);
    let reflect_kind_ = crate::path::reflect_kind_(tg_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(tg_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(tg_reflect_path);
    let macro_utils_ = crate::path::macro_utils_(tg_reflect_path);
    let option_ = crate::path::option_();
    let result_ = crate::path::result_();

    let names: Vec<_> = info.active_fields().map(|field| field.name_lit()).collect();
    let members: Vec<_> = info.active_fields().map(|field| &field.member).collect();
    let indices: Vec<_> = (0..members.len()).collect();
    let field_len = members.len();

    let items_fns = match info.items_field() {
        Some(field) => {
            let member = &field.member;
            quote! {
                #[inline]
                fn items(&self) -> #option_<&dyn #reflect_> {
                    #option_::Some(#reflect_::as_reflect(&self.#member))
                }

                #[inline]
                fn items_mut(&mut self) -> #option_<&mut dyn #reflect_> {
                    #option_::Some(#reflect_::as_reflect_mut(&mut self.#member))
                }
            }
        }
        None => TokenStream::new(),
    };

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(GenericBounds::Reflect);

    quote! {
        impl #impl_generics #struct_ for #real_ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> #option_<&dyn #reflect_> {
                match name {
                    #(#names => #option_::Some(#reflect_::as_reflect(&self.#members)),)*
                    _ => #option_::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> #option_<&mut dyn #reflect_> {
                match name {
                    #(#names => #option_::Some(#reflect_::as_reflect_mut(&mut self.#members)),)*
                    _ => #option_::None,
                }
            }

            fn field_at(&self, index: usize) -> #option_<&dyn #reflect_> {
                match index {
                    #(#indices => #option_::Some(#reflect_::as_reflect(&self.#members)),)*
                    _ => #option_::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> #option_<&mut dyn #reflect_> {
                match index {
                    #(#indices => #option_::Some(#reflect_::as_reflect_mut(&mut self.#members)),)*
                    _ => #option_::None,
                }
            }

            fn name_at(&self, index: usize) -> #option_<&str> {
                match index {
                    #(#indices => #option_::Some(#names),)*
                    _ => #option_::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }

            #items_fns
        }

        impl #impl_generics #reflect_ for #real_ident #ty_generics #where_clause {
            fn set(
                &mut self,
                value: #macro_utils_::Box<dyn #reflect_>,
            ) -> #result_<(), #macro_utils_::Box<dyn #reflect_>> {
                *self = <Self as #from_reflect_>::from_reflect(value)?;
                #result_::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::Struct
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Struct(self)
            }
        }

        impl #impl_generics #from_reflect_ for #real_ident #ty_generics #where_clause {}
    }
}
