use syn::{Field, Fields, LitStr, Member, spanned::Spanned};

use super::{FieldAttributes, ReflectMeta};

// -----------------------------------------------------------------------------
// StructField

/// One field of the derived struct.
pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// `self.#member` access.
    pub member: Member,
    /// The reflected name: the identifier, or `"0"`, `"1"`, ... for tuple structs.
    pub name: String,
}

impl StructField<'_> {
    #[inline]
    pub fn name_lit(&self) -> LitStr {
        LitStr::new(&self.name, self.data.span())
    }
}

// -----------------------------------------------------------------------------
// ReflectStruct

/// A struct to derive `Reflect` for.
pub(crate) struct ReflectStruct<'a> {
    meta: ReflectMeta<'a>,
    fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(meta: ReflectMeta<'a>, fields: &'a Fields) -> syn::Result<Self> {
        let fields = fields
            .iter()
            .enumerate()
            .map(|(index, data)| {
                let (member, name) = match &data.ident {
                    Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
                    None => (Member::Unnamed(index.into()), index.to_string()),
                };
                Ok(StructField {
                    data,
                    attrs: FieldAttributes::parse_attrs(&data.attrs)?,
                    member,
                    name,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        let mut items = fields.iter().filter_map(|field| field.attrs.items);
        if let (Some(_), Some(second)) = (items.next(), items.next()) {
            return Err(syn::Error::new(
                second,
                "only one field can be marked `#[reflect(items)]`",
            ));
        }

        Ok(Self { meta, fields })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    /// Fields exposed as properties, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields
            .iter()
            .filter(|field| field.attrs.skip.is_none() && field.attrs.items.is_none())
    }

    /// The `#[reflect(items)]` field, if any.
    pub fn items_field(&self) -> Option<&StructField<'a>> {
        self.fields.iter().find(|field| field.attrs.items.is_some())
    }

    /// Active fields followed by the items field.
    pub fn reflected_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.active_fields().chain(self.items_field())
    }
}
