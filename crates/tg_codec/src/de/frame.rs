use alloc::boxed::Box;
use alloc::string::String;

use tg_reflect::Reflect;
use tg_reflect::info::TypeInfo;
use tg_reflect::ops::ReflectRef;

// -----------------------------------------------------------------------------
// Shape

/// A type header read from the stream, kept for shape back-references.
pub(super) struct Shape {
    /// The local type, or the type path that did not resolve. Unresolved
    /// shapes can only be skipped.
    pub info: Result<&'static TypeInfo, String>,
    /// Local field index of each wire property, `None` if the local type
    /// has no such field.
    pub properties: Box<[Option<usize>]>,
}

// -----------------------------------------------------------------------------
// Target

/// The value a composite frame fills.
pub(super) enum Target {
    Owned(Box<dyn Reflect>),
    /// A `Shared` handle around the placeholder, already in the object cache.
    Shared(Box<dyn Reflect>),
    /// A fixed-size array. Arrays have no empty state, so the value is built
    /// from its items at the end marker.
    Deferred,
}

impl Target {
    /// Runs `f` on the placeholder, under the write lock if it is shared.
    ///
    /// Returns `None` for a deferred target.
    pub fn with<R>(&mut self, f: impl FnOnce(&mut dyn Reflect) -> R) -> Option<R> {
        match self {
            Self::Owned(value) => Some(f(&mut **value)),
            Self::Shared(handle) => {
                let ReflectRef::Shared(handle) = (**handle).reflect_ref() else {
                    return None;
                };
                let mut f = Some(f);
                let mut out = None;
                handle.with_inner_mut(&mut |inner| {
                    if let Some(f) = f.take() {
                        out = Some(f(inner));
                    }
                });
                out
            }
            Self::Deferred => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Frames

#[derive(Clone, Copy)]
pub(super) enum Phase {
    Properties,
    Items {
        len: usize,
        next: usize,
        map: bool,
        acc_start: usize,
    },
    /// Items are materialized, only `TYPE_END` remains.
    AwaitEnd,
}

/// A value opened by `TYPE_START`, `TYPE_START_KNOWN` or a shape reference.
pub(super) struct Composite {
    pub info: &'static TypeInfo,
    pub target: Target,
    pub shape: usize,
    pub cursor: usize,
    pub phase: Phase,
    /// Object slot reserved for a deferred value.
    pub shared: Option<usize>,
    /// Declared type of the slot this value goes to.
    pub declared: Option<&'static TypeInfo>,
}

/// A tuple or a pair, built from its parts at the end marker.
pub(super) struct Sequence {
    /// A `TypeInfo::Tuple` or a `TypeInfo::Pair`, `None` if the parts are
    /// read and dropped.
    pub info: Option<&'static TypeInfo>,
    pub pair: bool,
    pub arity: usize,
    pub next: usize,
    pub acc_start: usize,
    pub shared: Option<usize>,
    pub declared: Option<&'static TypeInfo>,
}

/// A composite that is read and dropped, e.g. the value of an unknown
/// property whose type is not registered.
pub(super) struct Skip {
    pub shape: usize,
    pub cursor: usize,
    pub phase: Phase,
}

pub(super) enum Frame {
    Composite(Composite),
    Sequence(Sequence),
    Skip(Skip),
}

// -----------------------------------------------------------------------------
// Declared types

/// Strips `Option` wrappers.
pub(super) fn peel_option(mut info: &'static TypeInfo) -> &'static TypeInfo {
    while let TypeInfo::Option(inner) = info {
        info = inner.inner().info();
    }
    info
}

/// The declared type of the value behind a `SHARED` marker.
pub(super) fn shared_inner(declared: Option<&'static TypeInfo>) -> Option<&'static TypeInfo> {
    match peel_option(declared?) {
        TypeInfo::Shared(info) => Some(info.inner().info()),
        other => Some(other),
    }
}

/// The list, array or map holding the items of a composite.
pub(super) fn container_of(info: &'static TypeInfo) -> Option<&'static TypeInfo> {
    match info {
        TypeInfo::Struct(info) => info.items().map(|field| field.type_info()),
        TypeInfo::List(_) | TypeInfo::Array(_) | TypeInfo::Map(_) => Some(info),
        _ => None,
    }
}

/// The declared type of item `position`; map keys and values alternate.
pub(super) fn item_info(container: &'static TypeInfo, position: usize) -> Option<&'static TypeInfo> {
    match container {
        TypeInfo::List(info) => Some(info.item().info()),
        TypeInfo::Array(info) => Some(info.item().info()),
        TypeInfo::Map(info) if position % 2 == 0 => Some(info.key().info()),
        TypeInfo::Map(info) => Some(info.value().info()),
        _ => None,
    }
}

/// The declared type of part `position` of a tuple or pair.
pub(super) fn part_info(sequence: &'static TypeInfo, position: usize) -> Option<&'static TypeInfo> {
    match sequence {
        TypeInfo::Tuple(info) => info.field_at(position).map(|field| field.type_info()),
        TypeInfo::Pair(info) if position == 0 => Some(info.key().info()),
        TypeInfo::Pair(info) => Some(info.value().info()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::sync::RwLock;

    use tg_reflect::info::Typed;
    use tg_reflect::{KeyValue, Shared};

    #[test]
    fn declared_helpers() {
        let info = <Option<Option<Shared<u8>>>>::type_info();
        assert!(peel_option(info).type_is::<Shared<u8>>());
        assert!(shared_inner(Some(info)).is_some_and(|inner| inner.type_is::<u8>()));
        assert!(shared_inner(None).is_none());

        let map = <BTreeMap<String, i64>>::type_info();
        assert!(container_of(map).is_some());
        assert!(item_info(map, 0).is_some_and(|i| i.type_is::<String>()));
        assert!(item_info(map, 3).is_some_and(|i| i.type_is::<i64>()));
        assert!(container_of(<u8>::type_info()).is_none());

        let list = <Vec<bool>>::type_info();
        assert!(item_info(list, 5).is_some_and(|i| i.type_is::<bool>()));

        let tuple = <(u8, String)>::type_info();
        assert!(part_info(tuple, 1).is_some_and(|i| i.type_is::<String>()));
        assert!(part_info(tuple, 2).is_none());
        let pair = <KeyValue<u8, String>>::type_info();
        assert!(part_info(pair, 0).is_some_and(|i| i.type_is::<u8>()));
    }

    #[test]
    fn shared_target_locks_inner() {
        let handle: Shared<i32> = Arc::new(RwLock::new(1));
        let mut target = Target::Shared(Box::new(handle.clone()));

        let done = target.with(|inner| inner.set(Box::new(9_i32)).is_ok());
        assert_eq!(done, Some(true));
        assert_eq!(*handle.read().unwrap(), 9);

        assert!(Target::Deferred.with(|_| ()).is_none());
    }
}
