use proc_macro2::Span;
use syn::{Attribute, Expr, Lit, LitStr, Meta, Token};
use syn::{parse::ParseStream, punctuated::Punctuated, spanned::Spanned};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Container level `#[reflect(...)]` options.
///
/// - `type_path = "a::b::C"`: the stable name written to the wire.
/// - `auto_register`: submit the type to the `inventory` registration list.
/// - `default = false`: do not register a placeholder constructor.
#[derive(Debug)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub auto_register: Option<Span>,
    pub default: bool,
}

impl Default for TypeAttributes {
    #[inline]
    fn default() -> Self {
        Self {
            type_path: None,
            auto_register: None,
            default: true,
        }
    }
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                attr.parse_args_with(|input: ParseStream| this.parse_stream(input))?;
            }
        }
        this.validity()?;
        Ok(this)
    }

    fn parse_stream(&mut self, input: ParseStream) -> syn::Result<()> {
        let metas = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;
        for meta in metas {
            match &meta {
                Meta::Path(path) if path.is_ident("auto_register") => {
                    self.auto_register = Some(path.span());
                }
                Meta::NameValue(pair) if pair.path.is_ident("type_path") => {
                    if self.type_path.is_some() {
                        return Err(syn::Error::new(pair.span(), "duplicate `type_path`"));
                    }
                    self.type_path = Some(parse_lit_str(&pair.value)?);
                }
                Meta::NameValue(pair) if pair.path.is_ident("default") => {
                    self.default = parse_lit_bool(&pair.value)?;
                }
                _ => {
                    return Err(syn::Error::new(
                        meta.span(),
                        "unknown attribute, expected `type_path = \"...\"`, `auto_register` or `default = false`",
                    ));
                }
            }
        }
        Ok(())
    }

    fn validity(&self) -> syn::Result<()> {
        if let Some(lit) = &self.type_path {
            let value = lit.value();
            if value.is_empty()
                || value.starts_with("::")
                || value.split("::").any(|segment| segment.trim().is_empty())
            {
                return Err(syn::Error::new(
                    lit.span(),
                    "`type_path` must look like `my_crate::module::Name`, without a leading `::`",
                ));
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field level `#[reflect(...)]` options.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    /// `#[reflect(skip)]`: not reflected, keeps its `Default` value on decode.
    pub skip: Option<Span>,
    /// `#[reflect(items)]`: the elements of this field are the items of the
    /// struct. The field is not a property.
    pub items: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
            for meta in metas {
                match &meta {
                    Meta::Path(path) if path.is_ident("skip") => this.skip = Some(path.span()),
                    Meta::Path(path) if path.is_ident("items") => this.items = Some(path.span()),
                    _ => {
                        return Err(syn::Error::new(
                            meta.span(),
                            "unknown field attribute, expected `skip` or `items`",
                        ));
                    }
                }
            }
        }

        if let (Some(_), Some(span)) = (this.skip, this.items) {
            return Err(syn::Error::new(span, "`items` field can not be skipped"));
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn parse_lit_str(expr: &Expr) -> syn::Result<LitStr> {
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(lit.clone()),
        _ => Err(syn::Error::new(expr.span(), "expected a string literal")),
    }
}

fn parse_lit_bool(expr: &Expr) -> syn::Result<bool> {
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: Lit::Bool(lit),
            ..
        }) => Ok(lit.value()),
        _ => Err(syn::Error::new(expr.span(), "expected `true` or `false`")),
    }
}
