use alloc::boxed::Box;
use alloc::sync::Arc;

use tg_reflect::Reflect;
use tg_reflect::ops::ReflectRef;

use crate::error::{CodecError, FormatError};
use crate::plan::Plan;

// -----------------------------------------------------------------------------
// Step

/// One move from a value to a value inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Field(usize),
    ItemsField,
    TupleSlot(usize),
    Element(usize),
    MapKey(usize),
    MapValue(usize),
    /// The map value stored under a snapshot key, by key slot.
    KeyedValue(usize),
    Key,
    Value,
    Some,
    Deref,
}

impl Step {
    /// Applies the step, or returns `None` if `value` has no such part.
    ///
    /// `keys` is the key snapshot of the maps being written.
    pub fn follow<'v>(self, value: &'v dyn Reflect, keys: &[Box<dyn Reflect>]) -> Option<&'v dyn Reflect> {
        match (self, value.reflect_ref()) {
            (Self::Field(index), ReflectRef::Struct(s)) => s.field_at(index),
            (Self::ItemsField, ReflectRef::Struct(s)) => s.items(),
            (Self::TupleSlot(index), ReflectRef::Tuple(t)) => t.field(index),
            (Self::Element(index), ReflectRef::List(l)) => l.get(index),
            (Self::Element(index), ReflectRef::Array(a)) => a.get(index),
            (Self::MapKey(index), ReflectRef::Map(m)) => m.get_at(index).map(|(k, _)| k),
            (Self::MapValue(index), ReflectRef::Map(m)) => m.get_at(index).map(|(_, v)| v),
            (Self::KeyedValue(slot), ReflectRef::Map(m)) => m.get(&**keys.get(slot)?),
            (Self::Key, ReflectRef::Pair(p)) => Some(p.key()),
            (Self::Value, ReflectRef::Pair(p)) => Some(p.value()),
            (Self::Some, ReflectRef::Option(o)) => o.get(),
            (Self::Deref, ReflectRef::Dynamic(inner)) => Some(inner),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Anchor

/// The value a scope path starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    /// The value passed to the call.
    Root,
    /// The inner value of a registered `Shared` handle.
    Handle(usize),
}

/// Resolves `anchor` + `path` and runs `f` on the value found.
///
/// For a handle anchor `f` runs while the handle's read lock is held.
pub(crate) fn resolve<R>(
    root: &dyn Reflect,
    handles: &[Box<dyn Reflect>],
    keys: &[Box<dyn Reflect>],
    anchor: Anchor,
    path: &[Step],
    f: impl FnOnce(&dyn Reflect) -> Result<R, CodecError>,
) -> Result<R, CodecError> {
    fn walk<'v>(
        mut value: &'v dyn Reflect,
        path: &[Step],
        keys: &[Box<dyn Reflect>],
    ) -> Result<&'v dyn Reflect, CodecError> {
        for step in path {
            value = step
                .follow(value, keys)
                .ok_or(FormatError::Traversal("a path no longer resolves"))?;
        }
        Ok(value)
    }

    let handle = match anchor {
        Anchor::Root => return f(walk(root, path, keys)?),
        Anchor::Handle(index) => handles
            .get(index)
            .ok_or(FormatError::Traversal("a handle anchor is missing"))?,
    };

    let ReflectRef::Shared(shared) = (**handle).reflect_ref() else {
        return Err(FormatError::Traversal("an anchor is not a shared handle").into());
    };

    let mut f = Some(f);
    let mut result = None;
    shared.with_inner(&mut |inner| {
        if let Some(f) = f.take() {
            result = Some(walk(inner, path, keys).and_then(f));
        }
    });
    result.unwrap_or(Err(FormatError::Traversal("a shared handle skipped its callback").into()))
}

// -----------------------------------------------------------------------------
// Scope

/// A traversal frame.
///
/// Scopes hold no borrows: the bound value is `anchor` followed by
/// `steps[start..]` of the session step stack, which is exactly the path of
/// the top scope. `base` is the length the step stack is cut back to when
/// the scope is popped.
pub(crate) struct Scope {
    pub anchor: Anchor,
    pub start: usize,
    pub base: usize,
    pub kind: ScopeKind,
}

pub(crate) enum ScopeKind {
    /// Writes the inner value of a newly registered handle.
    Value { hint: Option<Arc<Plan>>, done: bool },
    /// Runs a plan over the bound value.
    Plan { plan: Arc<Plan>, cursor: usize },
    /// Writes the elements of the bound list, array or map.
    ///
    /// Map entries count twice, key then value. A map whose keys are all
    /// leaves is walked through its key snapshot, starting at slot `keys`.
    Elements {
        len: usize,
        next: usize,
        hint: Option<Arc<Plan>>,
        value_hint: Option<Arc<Plan>>,
        keys: Option<usize>,
    },
}

/// What a scope asks for when it can not continue on its own.
pub(crate) enum Child {
    /// A composite, tuple or pair reached through the pending steps.
    Plan(Arc<Plan>),
    /// The elements of a container reached through the pending steps.
    ///
    /// `hint` is the element plan of a list and the key plan of a map.
    Elements {
        len: usize,
        hint: Option<Arc<Plan>>,
        value_hint: Option<Arc<Plan>>,
        keys: Option<usize>,
    },
    /// The inner value of a newly registered handle.
    Handle { index: usize, hint: Option<Arc<Plan>> },
}

#[cfg(test)]
mod tests {
    use super::{Anchor, Step, resolve};
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::sync::RwLock;

    use tg_reflect::derive::Reflect;
    use tg_reflect::{KeyValue, Reflect, Shared};

    #[derive(Reflect, Default)]
    struct Node {
        label: String,
        children: Vec<Option<Node>>,
        link: Option<Shared<Node>>,
    }

    #[test]
    fn follows_nested_steps() {
        let node = Node {
            label: String::from("root"),
            children: vec![None, Some(Node { label: String::from("leaf"), ..Node::default() })],
            link: None,
        };

        let path = [Step::Field(1), Step::Element(1), Step::Some, Step::Field(0)];
        let label = resolve(&node, &[], &[], Anchor::Root, &path, |v| {
            Ok(v.downcast_ref::<String>().cloned())
        })
        .unwrap();
        assert_eq!(label.as_deref(), Some("leaf"));

        let missing = [Step::Field(1), Step::Element(0), Step::Some];
        assert!(resolve(&node, &[], &[], Anchor::Root, &missing, |_| Ok(())).is_err());
    }

    #[test]
    fn handle_anchor_and_pairs() {
        let inner: Shared<Node> = Arc::new(RwLock::new(Node {
            label: String::from("shared"),
            ..Node::default()
        }));
        let handles: Vec<Box<dyn Reflect>> = vec![Box::new(inner)];

        let label = resolve(&0_u8, &handles, &[], Anchor::Handle(0), &[Step::Field(0)], |v| {
            Ok(v.downcast_ref::<String>().cloned())
        })
        .unwrap();
        assert_eq!(label.as_deref(), Some("shared"));

        let pair = KeyValue {
            key: 1_u8,
            value: String::from("v"),
        };
        let value = resolve(&pair, &[], &[], Anchor::Root, &[Step::Value], |v| Ok(v.is::<String>())).unwrap();
        assert!(value);
    }

    #[test]
    fn keyed_map_values() {
        let mut map = alloc::collections::BTreeMap::new();
        map.insert(String::from("b"), Node { label: String::from("bee"), ..Node::default() });
        let keys: Vec<Box<dyn Reflect>> = vec![Box::new(String::from("a")), Box::new(String::from("b"))];

        let label = resolve(&map, &[], &keys, Anchor::Root, &[Step::KeyedValue(1), Step::Field(0)], |v| {
            Ok(v.downcast_ref::<String>().cloned())
        })
        .unwrap();
        assert_eq!(label.as_deref(), Some("bee"));

        assert!(resolve(&map, &[], &keys, Anchor::Root, &[Step::KeyedValue(0)], |_| Ok(())).is_err());
        assert!(resolve(&map, &[], &keys, Anchor::Root, &[Step::KeyedValue(2)], |_| Ok(())).is_err());
    }

    #[test]
    fn deref_dynamic() {
        let boxed: Box<dyn Reflect> = Box::new(5_u16);
        let found = resolve(&boxed, &[], &[], Anchor::Root, &[Step::Deref], |v| Ok(v.is::<u16>())).unwrap();
        assert!(found);
    }
}
