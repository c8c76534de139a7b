use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to spell paths to `tg_*` crates in
/// generated code.
///
/// Derive output has to name `tg_reflect` the way the *invoking* crate sees
/// it. A crate may depend on `tg_reflect` directly, or only on the `tg_core`
/// facade, which re-exports it as `tg_core::reflect`.
///
/// # Example
///
/// ```rust
/// # use tg_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("tg_reflect"));
/// ```
///
/// # Resolution rules
///
/// 1. `name` is listed in `[dependencies]`: `::name`.
/// 2. `name` starts with `tg_` and `tg_core` is listed: `::tg_core::short`
///    (e.g. `tg_reflect` becomes `::tg_core::reflect`).
/// 3. Both rules again against `[dev-dependencies]`.
/// 4. Otherwise `::name`.
///
/// A crate naming itself should carry `extern crate self as name;` at its
/// root so that rule 4 also holds inside the crate.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "tg_core";
const CRATE_PREFIX: &str = "tg_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let Some(dir) = env::var_os("CARGO_MANIFEST_DIR") else {
            panic!("CARGO_MANIFEST_DIR should be defined by cargo");
        };
        let mut path = PathBuf::from(dir);
        path.push("Cargo.toml");
        path
    }

    fn modified_time(path: &Path) -> SystemTime {
        std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH)
    }

    #[inline(never)]
    fn read(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(text)
            .unwrap_or_else(|_| panic!("failed to parse cargo manifest: {}", path.display()))
    }

    fn path_of(segments: &[&str]) -> syn::Path {
        let mut path = syn::Path {
            leading_colon: Some(Default::default()),
            segments: Default::default(),
        };
        for segment in segments {
            path.segments
                .push(syn::Ident::new(segment, Span::call_site()).into());
        }
        path
    }

    fn find_in(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&[name]));
        }
        if let Some(short) = name.strip_prefix(CRATE_PREFIX)
            && deps.contains_key(FACADE_NAME)
        {
            return Some(Self::path_of(&[FACADE_NAME, short]));
        }
        None
    }

    /// Returns the path to the crate `name` as seen from the caller.
    ///
    /// See the type level documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(section)
                && let Some(path) = Self::find_in(deps, name)
            {
                return path;
            }
        }
        Self::path_of(&[name])
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Parsed manifests are cached per path and reparsed when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = Self::modified_time(&path);

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use std::time::SystemTime;
    use toml_edit::Document;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.into()).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn render(path: &syn::Path) -> String {
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\ntg_reflect = \"0.0.1\"\n");
        assert_eq!(render(&m.get_crate_path("tg_reflect")), "tg_reflect");
    }

    #[test]
    fn through_facade() {
        let m = manifest("[dev-dependencies]\ntg_core = { path = \"..\" }\n");
        assert_eq!(render(&m.get_crate_path("tg_reflect")), "tg_core::reflect");
    }

    #[test]
    fn fallback() {
        let m = manifest("[package]\nname = \"x\"\n");
        let path = m.get_crate_path("tg_reflect");
        assert!(path.leading_colon.is_some());
        assert_eq!(render(&path), "tg_reflect");
    }
}
