use proc_macro2::TokenStream;

use crate::derive_data::ReflectMeta;

/// Generate the `inventory` submission for `#[reflect(auto_register)]`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &ReflectMeta) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = meta.attrs().auto_register else {
        return TokenStream::new();
    };

    // A generic type has no single instantiation to register.
    if meta.impl_with_generic() {
        return TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(meta.tg_reflect_path());
    let real_ident = meta.real_ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#real_ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectMeta) -> TokenStream {
    TokenStream::new()
}
