use syn::{Generics, Path, parse::ParseStream};

/// Parsed input of [`impl_type_path`](crate::impl_type_path).
///
/// Format: `::my_crate::module::Type<T, U> where ...`, or a bare identifier
/// for primitives.
pub(crate) struct ReflectTypePathParser {
    pub type_path: Path,
    pub generics: Generics,
}

impl ReflectTypePathParser {
    pub fn parse(input: ParseStream) -> syn::Result<Self> {
        let type_path = Path::parse_mod_style(input)?;
        if type_path.segments.is_empty() {
            return Err(input.error("expected a type path"));
        }

        let mut generics = input.parse::<Generics>()?;
        generics.where_clause = input.parse()?;

        Ok(Self {
            type_path,
            generics,
        })
    }
}
