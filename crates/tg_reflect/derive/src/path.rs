//! Paths to `tg_reflect` items, as spelled in generated code.
//!
//! Keeping them in one place limits the changes needed when the layout of
//! `tg_reflect` moves.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `tg_reflect` crate.
///
/// 1. For crates that depend on `tg_reflect`, `::tg_reflect` is returned.
/// 2. For crates that depend on `tg_core`, `::tg_core::reflect` is returned.
/// 3. Otherwise `::tg_reflect`, which also holds inside `tg_reflect` itself.
///
/// Reading the manifest is not free, so the path is computed once per
/// invocation and passed around.
pub(crate) fn tg_reflect() -> syn::Path {
    tg_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("tg_reflect"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_utils_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::__macro_exports::macro_utils }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn reflect_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::Reflect }
}

#[inline(always)]
pub(crate) fn from_reflect_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::FromReflect }
}

#[inline]
pub(crate) fn type_path_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::info::TypePath }
}

#[inline]
pub(crate) fn typed_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::info::Typed }
}

#[inline]
pub(crate) fn type_info_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::info::TypeInfo }
}

#[inline]
pub(crate) fn struct_info_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::info::StructInfo }
}

#[inline]
pub(crate) fn named_field_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::info::NamedField }
}

#[inline]
pub(crate) fn reflect_kind_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::info::ReflectKind }
}

#[inline]
pub(crate) fn struct_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::ops::Struct }
}

#[inline]
pub(crate) fn reflect_ref_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::ops::ReflectRef }
}

#[inline]
pub(crate) fn reflect_mut_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::ops::ReflectMut }
}

#[inline]
pub(crate) fn non_generic_type_info_cell_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::impls::NonGenericTypeInfoCell }
}

#[inline]
pub(crate) fn generic_type_info_cell_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::impls::GenericTypeInfoCell }
}

#[inline]
pub(crate) fn generic_type_path_cell_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::impls::GenericTypePathCell }
}

#[inline]
pub(crate) fn type_meta_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::registry::TypeMeta }
}

#[inline]
pub(crate) fn get_type_meta_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::registry::GetTypeMeta }
}

#[inline]
pub(crate) fn from_type_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::registry::FromType }
}

#[inline]
pub(crate) fn type_registry_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::registry::TypeRegistry }
}

#[inline]
pub(crate) fn type_trait_default_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::registry::TypeTraitDefault }
}

#[inline]
pub(crate) fn type_trait_shared_(tg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tg_reflect_path::registry::TypeTraitShared }
}

// -----------------------------------------------------------------------------
// Core paths

/// `::core::option::Option`
#[inline(always)]
pub(crate) fn option_() -> TokenStream {
    quote! { ::core::option::Option }
}

/// `::core::result::Result`
#[inline(always)]
pub(crate) fn result_() -> TokenStream {
    quote! { ::core::result::Result }
}

/// `::core::any::Any + ::core::marker::Send + ::core::marker::Sync`
#[inline(always)]
pub(crate) fn any_send_sync_() -> TokenStream {
    quote! { ::core::any::Any + ::core::marker::Send + ::core::marker::Sync }
}
