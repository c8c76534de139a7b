//! See following macros:
//!
//! - [`Reflect`]
//! - [`impl_type_path`]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits for a struct:
///
/// - `TypePath`
/// - `Typed`
/// - `Struct`
/// - `Reflect`
/// - `FromReflect`
/// - `GetTypeMeta`
///
/// Named structs, tuple structs (fields `"0"`, `"1"`, ...) and unit structs
/// are supported. Enums and unions are rejected.
///
/// Generic type parameters are bounded by `Reflect + Typed + FromReflect`,
/// and additionally `GetTypeMeta` for the `GetTypeMeta` implementation.
///
/// ## Type Path
///
/// The default type path is `module_path!()` followed by the identifier. It is
/// written to the wire, so moving the type changes its encoded name. Pin it:
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(type_path = "shop::Order")]
/// struct Order { /* ... */ }
/// ```
///
/// Generic arguments are appended automatically.
///
/// ## Placeholder Construction
///
/// The decoder builds a `Default` value first and then assigns each field,
/// so `Default` is required. A type that is only ever encoded can opt out:
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(default = false)]
/// struct Report { /* ... */ }
/// ```
///
/// ## Fields
///
/// - `#[reflect(skip)]`: the field is not reflected and keeps its `Default`
///   value on decode.
/// - `#[reflect(items)]`: the elements of this list or map field are the
///   items of the struct, written after the properties. At most one field.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Playlist {
///     name: String,
///     #[reflect(items)]
///     tracks: Vec<Track>,
///     #[reflect(skip)]
///     cursor: usize,
/// }
/// ```
///
/// ## Auto Registration
///
/// With the `auto_register` feature, `#[reflect(auto_register)]` submits the
/// type to a global list that `TypeRegistry::auto_register` walks. Ignored for
/// generic types.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let info = match derive_data::reflect_struct_from_input(&ast) {
        Ok(info) => info,
        Err(err) => return err.into_compile_error().into(),
    };

    let type_path_impl = impls::impl_trait_type_path(info.meta());
    let typed_impl = impls::impl_trait_typed(&info);
    let struct_impl = impls::impl_struct(&info);
    let get_type_meta_impl = impls::impl_trait_get_type_meta(&info);
    let auto_register = impls::get_auto_register_impl(info.meta());

    TokenStream::from(quote! {
        const _: () = {
            #type_path_impl

            #typed_impl

            #struct_impl

            #get_type_meta_impl

            #auto_register
        };
    })
}

/// Implements `TypePath` for a type defined elsewhere.
///
/// Give the full path with a leading `::` and the generic parameters, each
/// of which is bounded by `TypePath`. A bare identifier is a primitive, whose
/// type path is the identifier itself.
///
/// ```rust, ignore
/// impl_type_path!(::alloc::vec::Vec<T>);
/// impl_type_path!(::std::collections::HashMap<K, V>);
/// impl_type_path!(bool);
/// ```
#[proc_macro]
pub fn impl_type_path(input: TokenStream) -> TokenStream {
    let def = parse_macro_input!(input with derive_data::ReflectTypePathParser::parse);

    let parser = derive_data::TypeParser::new_foreign(&def.type_path, &def.generics);
    let meta = derive_data::ReflectMeta::new(parser, derive_data::TypeAttributes::default());

    let type_path_impl = impls::impl_trait_type_path(&meta);

    TokenStream::from(quote! {
        const _: () = {
            #type_path_impl
        };
    })
}
