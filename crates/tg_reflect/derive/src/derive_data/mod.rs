//! Parsed input of the derive and function-like macros.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod define_parser;
mod reflect_meta;
mod reflect_struct;
mod type_parser;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};
pub(crate) use define_parser::ReflectTypePathParser;
pub(crate) use reflect_meta::{GenericBounds, ReflectMeta};
pub(crate) use reflect_struct::ReflectStruct;
pub(crate) use type_parser::TypeParser;

use syn::{Data, DeriveInput};

/// Parses a `#[derive(Reflect)]` input.
///
/// Only structs are accepted: named, tuple and unit.
pub(crate) fn reflect_struct_from_input(input: &DeriveInput) -> syn::Result<ReflectStruct<'_>> {
    let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
    let parser = TypeParser::new_local(&input.ident, attrs.type_path.clone(), &input.generics);
    let meta = ReflectMeta::new(parser, attrs);

    match &input.data {
        Data::Struct(data) => ReflectStruct::new(meta, &data.fields),
        Data::Enum(data) => Err(syn::Error::new(
            data.enum_token.span,
            "`Reflect` can not be derived for enums, only for structs",
        )),
        Data::Union(data) => Err(syn::Error::new(
            data.union_token.span,
            "`Reflect` can not be derived for unions, only for structs",
        )),
    }
}
