use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use tg_reflect::Reflect;
use tg_reflect::info::TypeInfo;
use tg_reflect::ops::{Map, ReflectRef, SharedRef};
use tg_utils::hash::HashMap;
use tg_utils::pool::Recycle;

use super::scope::{Anchor, Child, Scope, ScopeKind, Step, resolve};
use crate::cache::{self, ShapeTable, StringTable};
use crate::config::CacheWidth;
use crate::error::{CacheKind, CodecError, FormatError};
use crate::known::KnownTypes;
use crate::leaf::{is_default, write_leaf};
use crate::plan::{ItemSource, Plan, PlanCache, PlanItem, Slot};
use crate::source::write_varint;
use crate::wire;

// -----------------------------------------------------------------------------
// SerEnv

/// The writer side of a codec profile, for one call.
pub(crate) struct SerEnv<'a> {
    pub width: CacheWidth,
    pub known: Option<&'a KnownTypes>,
    pub tuples: bool,
}

// -----------------------------------------------------------------------------
// SerSession

/// Output buffer and caches, touched while a value is being read.
#[derive(Default)]
struct Emit {
    out: Vec<u8>,
    strings: StringTable,
    shapes: ShapeTable,
    identities: HashMap<usize, u32>,
    /// Handles registered during the current callback.
    fresh: Vec<Box<dyn Reflect>>,
    /// Number of handles registered before the current callback.
    anchored: usize,
    /// Map keys copied during the current callback.
    fresh_keys: Vec<Box<dyn Reflect>>,
    /// Number of snapshot keys taken before the current callback.
    keyed: usize,
    /// Steps from the current scope's value to the value being written.
    pending: Vec<Step>,
    /// Object indices of the shared arrays, tuples and pairs being written.
    built_last: Vec<usize>,
}

/// Traversal state, borrowed while a value is being read.
#[derive(Default)]
struct Walk {
    steps: Vec<Step>,
    /// Every handle registered in this call. Keeping them alive keeps their
    /// identities unique until the call ends.
    handles: Vec<Box<dyn Reflect>>,
    /// Key snapshots of the maps whose scopes are open, outermost first.
    keys: Vec<Box<dyn Reflect>>,
    scopes: Vec<Scope>,
}

/// Per-call state of the serializer.
///
/// Borrowed from the codec's pool for one call and recycled afterwards, on
/// success and on error alike.
#[derive(Default)]
pub(crate) struct SerSession {
    emit: Emit,
    walk: Walk,
}

impl Recycle for SerSession {
    fn reset(&mut self) {
        let Self { emit, walk } = self;
        emit.out.reset();
        emit.strings.clear();
        emit.shapes.clear();
        emit.identities.clear();
        emit.fresh.clear();
        emit.anchored = 0;
        emit.fresh_keys.clear();
        emit.keyed = 0;
        emit.pending.clear();
        emit.built_last.clear();
        walk.steps.clear();
        walk.handles.clear();
        walk.keys.clear();
        walk.scopes.clear();
    }
}

impl SerSession {
    /// The mode byte and opcodes written so far.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.emit.out
    }

    pub fn write_null(&mut self, width: CacheWidth) {
        self.emit.out.push(width.mode_byte());
        self.emit.out.push(wire::NULL);
    }

    /// Writes the mode byte and the opcodes of `root`.
    pub fn write(
        &mut self,
        root: &dyn Reflect,
        hint: Option<Arc<Plan>>,
        env: &SerEnv<'_>,
    ) -> Result<(), CodecError> {
        self.emit.out.push(env.width.mode_byte());
        self.emit.pending.clear();

        let child = self.emit.value(root, hint.as_ref(), false, env)?;
        self.walk.handles.append(&mut self.emit.fresh);
        if let Some(child) = child {
            self.push(Anchor::Root, 0, child);
        }

        while !self.walk.scopes.is_empty() {
            self.step(root, env)?;
        }
        Ok(())
    }

    /// Resumes the top scope until it finishes or needs a child.
    fn step(&mut self, root: &dyn Reflect, env: &SerEnv<'_>) -> Result<(), CodecError> {
        let Walk {
            steps,
            handles,
            keys,
            scopes,
        } = &mut self.walk;
        let Some(scope) = scopes.last_mut() else {
            return Ok(());
        };
        let (anchor, start) = (scope.anchor, scope.start);

        let emit = &mut self.emit;
        emit.anchored = handles.len();
        emit.keyed = keys.len();
        let snapshot = &keys[..];
        let child = resolve(root, &handles[..], snapshot, anchor, &steps[start..], |value| {
            emit.run(value, &mut scope.kind, snapshot, env)
        })?;
        handles.append(&mut emit.fresh);
        keys.append(&mut emit.fresh_keys);

        match child {
            Some(child) => self.push(anchor, start, child),
            None => {
                if let Some(scope) = self.walk.scopes.pop() {
                    self.walk.steps.truncate(scope.base);
                    match (scope.anchor, scope.kind) {
                        (_, ScopeKind::Elements { keys: Some(slot), .. }) => self.walk.keys.truncate(slot),
                        (Anchor::Handle(index), ScopeKind::Value { .. }) => {
                            if self.emit.built_last.last() == Some(&index) {
                                self.emit.built_last.pop();
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn push(&mut self, anchor: Anchor, start: usize, child: Child) {
        let base = self.walk.steps.len();
        let pending = &mut self.emit.pending;

        let (anchor, start, kind) = match child {
            Child::Plan(plan) => {
                self.walk.steps.extend(pending.drain(..));
                (anchor, start, ScopeKind::Plan { plan, cursor: 0 })
            }
            Child::Elements {
                len,
                hint,
                value_hint,
                keys,
            } => {
                self.walk.steps.extend(pending.drain(..));
                let kind = ScopeKind::Elements {
                    len,
                    next: 0,
                    hint,
                    value_hint,
                    keys,
                };
                (anchor, start, kind)
            }
            Child::Handle { index, hint } => {
                pending.clear();
                (Anchor::Handle(index), base, ScopeKind::Value { hint, done: false })
            }
        };

        self.walk.scopes.push(Scope {
            anchor,
            start,
            base,
            kind,
        });
    }
}

// -----------------------------------------------------------------------------
// Emit

const RESIZED: FormatError = FormatError::Traversal("a container changed length");

/// Element plan hints: the element or key plan, then the map value plan.
type Hints<'a> = (Option<&'a Arc<Plan>>, Option<&'a Arc<Plan>>);

fn struct_field(value: &dyn Reflect, field: usize) -> Result<&dyn Reflect, CodecError> {
    match value.reflect_ref() {
        ReflectRef::Struct(s) => s
            .field_at(field)
            .ok_or_else(|| FormatError::Traversal("a planned field is missing").into()),
        _ => Err(FormatError::Traversal("a planned struct is not a struct").into()),
    }
}

/// Whether the handle holds an array, a tuple or a pair.
///
/// Readers build those values from their parts at the end marker, so a
/// back-reference from inside one can not be resolved.
fn built_from_parts(handle: &dyn SharedRef) -> bool {
    let TypeInfo::Shared(info) = handle.reflect_type_info() else {
        return false;
    };
    let mut inner = info.inner().info();
    while let TypeInfo::Option(option) = inner {
        inner = option.inner().info();
    }
    matches!(inner, TypeInfo::Array(_) | TypeInfo::Tuple(_) | TypeInfo::Pair(_))
}

fn plan_of(value: &dyn Reflect, hint: Option<&Arc<Plan>>) -> Result<Arc<Plan>, CodecError> {
    if let Some(plan) = hint
        && plan.ty().id() == value.ty_id()
    {
        return Ok(plan.clone());
    }
    PlanCache::global()
        .get(value.reflect_type_info())
        .ok_or_else(|| FormatError::Traversal("a value has no plan").into())
}

impl Emit {
    fn run(
        &mut self,
        value: &dyn Reflect,
        kind: &mut ScopeKind,
        keys: &[Box<dyn Reflect>],
        env: &SerEnv<'_>,
    ) -> Result<Option<Child>, CodecError> {
        match kind {
            ScopeKind::Value { hint, done } => {
                if *done {
                    return Ok(None);
                }
                *done = true;
                self.pending.clear();
                self.value(value, hint.as_ref(), true, env)
            }
            ScopeKind::Plan { plan, cursor } => {
                while let Some(item) = plan.items().get(*cursor) {
                    *cursor += 1;
                    if let Some(child) = self.item(value, plan, item, env)? {
                        return Ok(Some(child));
                    }
                }
                Ok(None)
            }
            ScopeKind::Elements {
                len,
                next,
                hint,
                value_hint,
                keys: slot,
            } => {
                let hints = (hint.as_ref(), value_hint.as_ref());
                match slot {
                    Some(slot) => self.keyed_entries(value, *len, next, keys, *slot, hints, env),
                    None => self.elements(value, *len, next, hints, env),
                }
            }
        }
    }

    /// Writes any value: a leaf, null, a back-reference, or the start of a
    /// handle. Composites, tuples and pairs are returned as a child plan.
    fn value(
        &mut self,
        mut value: &dyn Reflect,
        hint: Option<&Arc<Plan>>,
        in_shared: bool,
        env: &SerEnv<'_>,
    ) -> Result<Option<Child>, CodecError> {
        loop {
            match value.reflect_ref() {
                ReflectRef::Leaf(leaf) => {
                    write_leaf(&mut self.out, &mut self.strings, env.width, leaf)?;
                    return Ok(None);
                }
                ReflectRef::Option(option) => match option.get() {
                    Some(inner) => {
                        self.pending.push(Step::Some);
                        value = inner;
                    }
                    None => {
                        self.out.push(wire::NULL);
                        return Ok(None);
                    }
                },
                ReflectRef::Dynamic(inner) => {
                    self.pending.push(Step::Deref);
                    value = inner;
                }
                ReflectRef::Shared(handle) => {
                    if in_shared {
                        return Err(CodecError::Unsupported {
                            what: "a shared handle directly inside another",
                        });
                    }
                    return self.shared(handle, hint, env);
                }
                ReflectRef::Tuple(_) | ReflectRef::Pair(_) if !env.tuples => {
                    return Err(CodecError::Unsupported {
                        what: "tuples and pairs",
                    });
                }
                _ => return Ok(Some(Child::Plan(plan_of(value, hint)?))),
            }
        }
    }

    fn shared(
        &mut self,
        handle: &dyn SharedRef,
        hint: Option<&Arc<Plan>>,
        env: &SerEnv<'_>,
    ) -> Result<Option<Child>, CodecError> {
        let identity = handle.identity();
        if let Some(&index) = self.identities.get(&identity) {
            if self.built_last.contains(&(index as usize)) {
                return Err(CodecError::Unsupported {
                    what: "a shared array, tuple or pair that contains its own handle",
                });
            }
            cache::write_ref(&mut self.out, wire::OBJECT_REF_0, wire::OBJECT_REF, index, env.width);
            return Ok(None);
        }

        let index = self.identities.len();
        if index >= env.width.capacity() {
            return Err(FormatError::CacheOverflow {
                cache: CacheKind::Object,
                index,
                width: env.width,
            }
            .into());
        }
        self.identities.insert(identity, index as u32);
        self.out.push(wire::SHARED);
        if built_from_parts(handle) {
            self.built_last.push(index);
        }

        self.fresh.push(handle.clone_handle());
        Ok(Some(Child::Handle {
            index: self.anchored + self.fresh.len() - 1,
            hint: hint.cloned(),
        }))
    }

    fn item(
        &mut self,
        value: &dyn Reflect,
        plan: &Plan,
        item: &PlanItem,
        env: &SerEnv<'_>,
    ) -> Result<Option<Child>, CodecError> {
        match item {
            PlanItem::WriteConstantBytes(bytes) => self.out.extend_from_slice(bytes),
            PlanItem::TypeStart => self.type_start(plan, env),
            PlanItem::ListStart {
                source,
                element_hint,
            } => {
                let len = match self.container(value, *source)?.reflect_ref() {
                    ReflectRef::List(list) => list.len(),
                    ReflectRef::Array(array) => array.len(),
                    _ => return Err(FormatError::Traversal("list items are not a list").into()),
                };
                self.out.push(wire::LIST_START);
                write_varint(&mut self.out, len as u64);
                if len > 0 {
                    return Ok(Some(Child::Elements {
                        len,
                        hint: element_hint.clone(),
                        value_hint: None,
                        keys: None,
                    }));
                }
            }
            PlanItem::MapStart {
                source,
                key_hint,
                value_hint,
            } => {
                let ReflectRef::Map(map) = self.container(value, *source)?.reflect_ref() else {
                    return Err(FormatError::Traversal("map items are not a map").into());
                };
                let len = map.len();
                self.out.push(wire::MAP_START);
                write_varint(&mut self.out, len as u64);
                if len > 0 {
                    return Ok(Some(Child::Elements {
                        len,
                        hint: key_hint.clone(),
                        value_hint: value_hint.clone(),
                        keys: self.snapshot_keys(map),
                    }));
                }
            }
            PlanItem::TupleStart { arity } => {
                self.out.push(wire::TUPLE_START);
                self.out.push(*arity);
            }
            PlanItem::PairStart => self.out.push(wire::PAIR_START),
            PlanItem::PropertyValue { field, .. } => match struct_field(value, *field)?.reflect_ref() {
                ReflectRef::Leaf(leaf) if is_default(leaf) => self.out.push(wire::NULL),
                ReflectRef::Leaf(leaf) => write_leaf(&mut self.out, &mut self.strings, env.width, leaf)?,
                _ => return Err(FormatError::Traversal("a leaf property is not a leaf").into()),
            },
            PlanItem::PropertyReference { field, hint, .. } => {
                let property = struct_field(value, *field)?;
                self.pending.clear();
                self.pending.push(Step::Field(*field));
                return self.value(property, hint.as_ref(), false, env);
            }
            PlanItem::ValueLeaf { .. } => match value.reflect_ref() {
                ReflectRef::Leaf(leaf) => write_leaf(&mut self.out, &mut self.strings, env.width, leaf)?,
                _ => return Err(FormatError::Traversal("a planned leaf is not a leaf").into()),
            },
            PlanItem::RuntimeTypedValue { slot, hint, .. } => {
                let (step, part) = match (slot, value.reflect_ref()) {
                    (Slot::Field(index), ReflectRef::Tuple(t)) => (Step::TupleSlot(*index), t.field(*index)),
                    (Slot::Key, ReflectRef::Pair(p)) => (Step::Key, Some(p.key())),
                    (Slot::Value, ReflectRef::Pair(p)) => (Step::Value, Some(p.value())),
                    _ => (Step::Key, None),
                };
                let part = part.ok_or(FormatError::Traversal("a planned slot is missing"))?;
                self.pending.clear();
                self.pending.push(step);
                return self.value(part, hint.as_ref(), false, env);
            }
        }
        Ok(None)
    }

    fn type_start(&mut self, plan: &Plan, env: &SerEnv<'_>) {
        let type_id = plan.ty().id();
        if let Some(index) = self.shapes.get(type_id) {
            cache::write_ref(&mut self.out, wire::SHAPE_REF_0, wire::SHAPE_REF, index, env.width);
            return;
        }

        match env.known.and_then(|known| known.fingerprint_of(type_id)) {
            Some(print) => {
                self.out.push(wire::TYPE_START_KNOWN);
                self.out.extend_from_slice(print);
            }
            None => {
                self.out.push(wire::TYPE_START);
                cache::write_str(&mut self.out, &mut self.strings, env.width, plan.type_path());
                write_varint(&mut self.out, plan.property_names().len() as u64);
                for name in plan.property_names() {
                    cache::write_str(&mut self.out, &mut self.strings, env.width, name);
                }
            }
        }
        self.shapes.register(type_id, env.width);
    }

    /// The list or map whose elements follow, recording the step to it.
    fn container<'v>(&mut self, value: &'v dyn Reflect, source: ItemSource) -> Result<&'v dyn Reflect, CodecError> {
        self.pending.clear();
        match source {
            ItemSource::Value => Ok(value),
            ItemSource::ItemsField => {
                self.pending.push(Step::ItemsField);
                match value.reflect_ref() {
                    ReflectRef::Struct(s) => s
                        .items()
                        .ok_or_else(|| FormatError::Traversal("a planned items field is missing").into()),
                    _ => Err(FormatError::Traversal("a planned struct is not a struct").into()),
                }
            }
        }
    }

    /// Copies the keys of `map` so its values can be found again by key.
    ///
    /// Returns the first snapshot slot, or `None` if a key is not a leaf.
    fn snapshot_keys(&mut self, map: &dyn Map) -> Option<usize> {
        let start = self.fresh_keys.len();
        for (key, _) in map.iter() {
            let copy = match key.reflect_ref() {
                ReflectRef::Leaf(leaf) => Some(leaf.to_value().into_reflect()),
                _ => None,
            };
            match copy {
                Some(copy) if map.get(&*copy).is_some() => self.fresh_keys.push(copy),
                _ => {
                    self.fresh_keys.truncate(start);
                    return None;
                }
            }
        }
        Some(self.keyed + start)
    }

    fn element(
        &mut self,
        value: &dyn Reflect,
        step: Step,
        hint: Option<&Arc<Plan>>,
        env: &SerEnv<'_>,
    ) -> Result<Option<Child>, CodecError> {
        self.pending.clear();
        self.pending.push(step);
        self.value(value, hint, false, env)
    }

    /// Writes map entries from `next` on, finding each value by its
    /// snapshot key.
    fn keyed_entries(
        &mut self,
        container: &dyn Reflect,
        len: usize,
        next: &mut usize,
        keys: &[Box<dyn Reflect>],
        slot: usize,
        (hint, value_hint): Hints<'_>,
        env: &SerEnv<'_>,
    ) -> Result<Option<Child>, CodecError> {
        let ReflectRef::Map(map) = container.reflect_ref() else {
            return Err(FormatError::Traversal("entries of a value that is not a map").into());
        };
        let keys = keys.get(slot..slot + len).ok_or(RESIZED)?;
        if map.len() != len {
            return Err(RESIZED.into());
        }

        while *next < 2 * len {
            let entry = *next / 2;
            let key = &*keys[entry];
            let child = if *next % 2 == 0 {
                *next += 1;
                self.element(key, Step::MapKey(entry), hint, env)?
            } else {
                *next += 1;
                let value = map.get(key).ok_or(RESIZED)?;
                self.element(value, Step::KeyedValue(slot + entry), value_hint, env)?
            };
            if child.is_some() {
                return Ok(child);
            }
        }
        Ok(None)
    }

    /// Writes elements from `next` on, until one needs a scope of its own.
    fn elements(
        &mut self,
        container: &dyn Reflect,
        len: usize,
        next: &mut usize,
        (hint, value_hint): Hints<'_>,
        env: &SerEnv<'_>,
    ) -> Result<Option<Child>, CodecError> {
        match container.reflect_ref() {
            ReflectRef::List(list) => {
                if list.len() != len {
                    return Err(RESIZED.into());
                }
                while *next < len {
                    let index = *next;
                    *next += 1;
                    let element = list.get(index).ok_or(RESIZED)?;
                    if let Some(child) = self.element(element, Step::Element(index), hint, env)? {
                        return Ok(Some(child));
                    }
                }
            }
            ReflectRef::Array(array) => {
                if array.len() != len {
                    return Err(RESIZED.into());
                }
                while *next < len {
                    let index = *next;
                    *next += 1;
                    let element = array.get(index).ok_or(RESIZED)?;
                    if let Some(child) = self.element(element, Step::Element(index), hint, env)? {
                        return Ok(Some(child));
                    }
                }
            }
            ReflectRef::Map(map) => {
                if map.len() != len {
                    return Err(RESIZED.into());
                }
                for (entry, (key, value)) in map.iter().enumerate().skip(*next / 2) {
                    if *next % 2 == 0 {
                        *next += 1;
                        if let Some(child) = self.element(key, Step::MapKey(entry), hint, env)? {
                            return Ok(Some(child));
                        }
                    }
                    *next += 1;
                    if let Some(child) = self.element(value, Step::MapValue(entry), value_hint, env)? {
                        return Ok(Some(child));
                    }
                }
            }
            _ => return Err(FormatError::Traversal("elements of a value that is not a container").into()),
        }
        Ok(None)
    }
}
