use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{GenericParam, Generics, Ident, LitStr, Path, punctuated::Punctuated};

/// Where the names of a type come from.
pub(crate) enum TypeParser<'a> {
    /// Types without a crate/module that can be named from any scope (e.g. `bool`).
    Primitive(&'a Ident),
    /// A type defined in the calling crate, named through `module_path!()`
    /// unless a `type_path` attribute overrides it.
    Local {
        ident: &'a Ident,
        custom_path: Option<LitStr>,
        generics: &'a Generics,
    },
    /// A foreign type given with its full path, e.g. `::alloc::vec::Vec`.
    Foreign {
        path: &'a Path,
        generics: &'a Generics,
    },
}

impl<'a> TypeParser<'a> {
    pub(crate) fn new_local(
        ident: &'a Ident,
        custom_path: Option<LitStr>,
        generics: &'a Generics,
    ) -> Self {
        Self::Local {
            ident,
            custom_path,
            generics,
        }
    }

    pub(crate) fn new_foreign(path: &'a Path, generics: &'a Generics) -> Self {
        match path.get_ident() {
            Some(ident) if path.leading_colon.is_none() && generics.params.is_empty() => {
                Self::Primitive(ident)
            }
            _ => Self::Foreign { path, generics },
        }
    }

    pub(crate) fn generics(&self) -> &'a Generics {
        const EMPTY_GENERICS: &Generics = &Generics {
            gt_token: None,
            lt_token: None,
            where_clause: None,
            params: Punctuated::new(),
        };

        match self {
            Self::Local { generics, .. } | Self::Foreign { generics, .. } => generics,
            Self::Primitive(_) => EMPTY_GENERICS,
        }
    }

    /// Whether the implementation is generic over types or constants.
    pub(crate) fn impl_with_generic(&self) -> bool {
        !self
            .generics()
            .params
            .iter()
            .all(|param| matches!(param, GenericParam::Lifetime(_)))
    }

    /// This name is used in `impl ... for #real_ident {...}`.
    pub(crate) fn real_ident(&self) -> TokenStream {
        match self {
            Self::Local { ident, .. } | Self::Primitive(ident) => ident.to_token_stream(),
            Self::Foreign { path, .. } => path.to_token_stream(),
        }
    }

    /// The last path segment, e.g. `"Vec"`.
    pub(crate) fn type_ident(&self) -> String {
        match self {
            Self::Primitive(ident) => ident.to_string(),
            Self::Local {
                ident, custom_path, ..
            } => match custom_path {
                Some(lit) => split_custom(&lit.value()).1.to_owned(),
                None => ident.to_string(),
            },
            Self::Foreign { path, .. } => path
                .segments
                .last()
                .map(|segment| segment.ident.to_string())
                .unwrap_or_default(),
        }
    }

    /// An expression of type `&'static str` naming the module, if any.
    pub(crate) fn module_path(&self) -> Option<TokenStream> {
        match self {
            Self::Primitive(_) => None,
            Self::Local { custom_path, .. } => match custom_path {
                Some(lit) => {
                    let value = lit.value();
                    let (module, _) = split_custom(&value);
                    module.map(|module| LitStr::new(module, lit.span()).into_token_stream())
                }
                None => Some(quote! { ::core::module_path!() }),
            },
            Self::Foreign { path, .. } => {
                let module = path
                    .segments
                    .iter()
                    .take(path.segments.len().saturating_sub(1))
                    .map(|segment| segment.ident.to_string())
                    .reduce(|path, ident| path + "::" + &ident)?;
                Some(LitStr::new(&module, proc_macro2::Span::call_site()).into_token_stream())
            }
        }
    }

    /// Expressions rendering each generic argument, lifetimes excluded.
    ///
    /// Type parameters go through `type_fn` (`type_path` or `type_name`),
    /// const parameters are formatted with `Display`.
    pub(crate) fn generic_args(&self, type_path_: &TokenStream, type_fn: &Ident) -> Vec<TokenStream> {
        self.generics()
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(param) => {
                    let ident = &param.ident;
                    Some(quote! { <#ident as #type_path_>::#type_fn() })
                }
                GenericParam::Const(param) => {
                    let ident = &param.ident;
                    Some(quote! { #ident })
                }
                GenericParam::Lifetime(_) => None,
            })
            .collect()
    }
}

/// Splits `a::b::C` into `(Some("a::b"), "C")`.
fn split_custom(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once("::") {
        Some((module, ident)) => (Some(module), ident),
        None => (None, path),
    }
}
