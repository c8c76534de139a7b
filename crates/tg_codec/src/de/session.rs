use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use tg_reflect::Reflect;
use tg_reflect::info::TypeInfo;
use tg_reflect::ops::{LeafValue, ReflectMut, ReflectRef};
use tg_reflect::registry::{TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitShared};
use tg_utils::pool::Recycle;

use super::frame::{
    Composite, Frame, Phase, Sequence, Shape, Skip, Target, container_of, item_info, part_info,
    peel_option, shared_inner,
};
use crate::cache::{self, StringList};
use crate::config::{CacheWidth, UnknownPropertyPolicy};
use crate::error::{CacheKind, CodecError, FormatError, SchemaMismatch, TypeResolutionError};
use crate::known::{FINGERPRINT_LEN, KnownTypes};
use crate::leaf::{read_leaf, zero_value};
use crate::source::{Source, read_len};
use crate::wire;

/// Upper bound on what a length read from the stream may reserve up front.
const MAX_PREALLOC: usize = 1 << 12;

// -----------------------------------------------------------------------------
// DeEnv

/// The reader side of a codec, for one call.
pub(crate) struct DeEnv<'a> {
    pub width: CacheWidth,
    pub registry: &'a TypeRegistry,
    pub known: &'a KnownTypes,
    pub policy: UnknownPropertyPolicy,
}

// -----------------------------------------------------------------------------
// DeSession

/// Where the next value goes.
#[derive(Clone, Copy)]
enum Slot {
    Root,
    /// A property of the open composite, `None` if the value is dropped.
    Property(Option<usize>),
    /// An item of a list or map, or a part of a tuple or pair.
    Item,
    /// An item or part of a value that is dropped.
    Discarded,
}

impl Slot {
    /// Whether the value is read only to be dropped.
    #[inline]
    fn discards(self) -> bool {
        matches!(self, Self::Property(None) | Self::Discarded)
    }
}

/// What the open frame accepts next.
enum Expect {
    Value {
        slot: Slot,
        declared: Option<&'static TypeInfo>,
    },
    /// All properties are read: items or `TYPE_END`.
    PropertiesEnd,
    ItemsEnd {
        map: bool,
    },
    TypeEnd,
    SequenceEnd {
        end: u8,
    },
}

enum Flow {
    Continue,
    /// A complete value, `None` for null.
    Value(Option<Box<dyn Reflect>>),
}

/// Per-call state of the deserializer.
///
/// Borrowed from the codec's pool for one call and recycled afterwards, on
/// success and on error alike.
#[derive(Default)]
pub(crate) struct DeSession {
    frames: Vec<Frame>,
    /// Items and parts of the open frames, each frame owns a suffix.
    acc: Vec<Box<dyn Reflect>>,
    strings: StringList,
    shapes: Vec<Shape>,
    /// `Shared` handles by object index. A slot is reserved by `SHARED` and
    /// filled as soon as the handle exists.
    objects: Vec<Option<Box<dyn Reflect>>>,
    /// Object slot reserved by a `SHARED` marker for the next value.
    mark: Option<usize>,
    scratch: Vec<u8>,
    dropped: Vec<SchemaMismatch>,
}

impl Recycle for DeSession {
    fn reset(&mut self) {
        self.frames.clear();
        self.acc.clear();
        self.strings.clear();
        self.shapes.clear();
        self.objects.clear();
        self.mark = None;
        self.scratch.reset();
        self.dropped.clear();
    }
}

impl DeSession {
    /// Properties dropped by the last call.
    #[inline]
    pub fn take_dropped(&mut self) -> Vec<SchemaMismatch> {
        core::mem::take(&mut self.dropped)
    }

    /// Reads the opcodes of one root value, stopping right after its last byte.
    ///
    /// Returns `None` for a null root.
    pub fn read(
        &mut self,
        src: &mut impl Source,
        declared: Option<&'static TypeInfo>,
        env: &DeEnv<'_>,
    ) -> Result<Option<Box<dyn Reflect>>, CodecError> {
        loop {
            let expect = self.expect(declared);
            let opcode = src.read_u8()?;

            let flow = match expect {
                Expect::Value { slot, declared } => self.value(opcode, src, slot, declared, env)?,
                Expect::PropertiesEnd => self.properties_end(opcode, src, env)?,
                Expect::ItemsEnd { map } => self.items_end(opcode, map)?,
                Expect::TypeEnd => match opcode {
                    wire::TYPE_END => self.type_end(env)?,
                    _ => {
                        return Err(FormatError::UnknownOpcode {
                            opcode,
                            context: "the end of a type",
                        }
                        .into());
                    }
                },
                Expect::SequenceEnd { end } if opcode == end => self.sequence_end(env)?,
                Expect::SequenceEnd { .. } => {
                    return Err(FormatError::UnknownOpcode {
                        opcode,
                        context: "the end of a tuple or pair",
                    }
                    .into());
                }
            };

            if let Flow::Value(value) = flow {
                if self.frames.is_empty() {
                    return Ok(value);
                }
                self.deliver(value)?;
            }
        }
    }

    fn expect(&self, root: Option<&'static TypeInfo>) -> Expect {
        let Some(frame) = self.frames.last() else {
            return Expect::Value {
                slot: Slot::Root,
                declared: root,
            };
        };

        match frame {
            Frame::Composite(frame) => match frame.phase {
                Phase::Properties => {
                    let field = self.shapes.get(frame.shape).and_then(|shape| shape.properties.get(frame.cursor));
                    match field {
                        Some(&field) => Expect::Value {
                            slot: Slot::Property(field),
                            declared: field.and_then(|field| field_info(frame.info, field)),
                        },
                        None => Expect::PropertiesEnd,
                    }
                }
                Phase::Items { len, next, .. } if next < len => Expect::Value {
                    slot: Slot::Item,
                    declared: container_of(frame.info).and_then(|container| item_info(container, next)),
                },
                Phase::Items { map, .. } => Expect::ItemsEnd { map },
                Phase::AwaitEnd => Expect::TypeEnd,
            },
            Frame::Sequence(frame) if frame.next < frame.arity => match frame.info {
                Some(info) => Expect::Value {
                    slot: Slot::Item,
                    declared: part_info(info, frame.next),
                },
                None => Expect::Value {
                    slot: Slot::Discarded,
                    declared: None,
                },
            },
            Frame::Sequence(frame) => Expect::SequenceEnd {
                end: if frame.pair { wire::PAIR_END } else { wire::TUPLE_END },
            },
            Frame::Skip(frame) => match frame.phase {
                Phase::Properties => {
                    let count = self.shapes.get(frame.shape).map_or(0, |shape| shape.properties.len());
                    if frame.cursor < count {
                        Expect::Value {
                            slot: Slot::Property(None),
                            declared: None,
                        }
                    } else {
                        Expect::PropertiesEnd
                    }
                }
                Phase::Items { len, next, .. } if next < len => Expect::Value {
                    slot: Slot::Discarded,
                    declared: None,
                },
                Phase::Items { map, .. } => Expect::ItemsEnd { map },
                Phase::AwaitEnd => Expect::TypeEnd,
            },
        }
    }

    // -------------------------------------------------------------------------
    // Values

    fn value(
        &mut self,
        opcode: u8,
        src: &mut impl Source,
        slot: Slot,
        declared: Option<&'static TypeInfo>,
        env: &DeEnv<'_>,
    ) -> Result<Flow, CodecError> {
        if opcode == wire::SHARED {
            if self.mark.is_some() {
                return Err(FormatError::UnknownOpcode {
                    opcode,
                    context: "the value of a shared handle",
                }
                .into());
            }
            let index = self.objects.len();
            if index >= env.width.capacity() {
                return Err(FormatError::CacheOverflow {
                    cache: CacheKind::Object,
                    index,
                    width: env.width,
                }
                .into());
            }
            self.objects.push(None);
            self.mark = Some(index);
            return Ok(Flow::Continue);
        }

        let mark = self.mark.take();
        let discard = slot.discards();
        let inner = match mark {
            Some(_) => shared_inner(declared),
            None => declared,
        };

        match opcode {
            wire::NULL => {
                if discard || (mark.is_none() && matches!(slot, Slot::Root)) {
                    return Ok(Flow::Value(None));
                }
                let value = null_value(inner)?;
                return self.finish(value, mark, declared, env).map(|v| Flow::Value(Some(v)));
            }
            wire::TYPE_START | wire::TYPE_START_KNOWN => {
                let shape = self.read_shape(opcode, src, discard, env)?;
                self.open(shape, mark, declared, discard, env)?;
                return Ok(Flow::Continue);
            }
            wire::TUPLE_START | wire::PAIR_START => {
                self.open_sequence(opcode, src, mark, declared, discard)?;
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        if let Some(index) = cache::ref_index(opcode, wire::SHAPE_REF_0, wire::SHAPE_REF, src, env.width)? {
            if index >= self.shapes.len() {
                return Err(FormatError::BadReference {
                    cache: CacheKind::Shape,
                    index,
                }
                .into());
            }
            self.open(index, mark, declared, discard, env)?;
            return Ok(Flow::Continue);
        }

        if let Some(index) = cache::ref_index(opcode, wire::OBJECT_REF_0, wire::OBJECT_REF, src, env.width)? {
            if mark.is_some() {
                return Err(FormatError::UnknownOpcode {
                    opcode,
                    context: "the value of a shared handle",
                }
                .into());
            }
            let handle = match self.objects.get(index) {
                // Objects inside dropped values may never be filled.
                Some(None) if discard => return Ok(Flow::Value(None)),
                Some(Some(handle)) => clone_handle(&**handle),
                _ => None,
            };
            let handle = handle.ok_or(FormatError::BadReference {
                cache: CacheKind::Object,
                index,
            })?;
            return Ok(Flow::Value(Some(handle)));
        }

        match read_leaf(opcode, src, &mut self.strings, env.width, &mut self.scratch)? {
            Some(_) if discard => Ok(Flow::Value(None)),
            Some(leaf) => {
                let value = self.finish(leaf.into_reflect(), mark, declared, env)?;
                Ok(Flow::Value(Some(value)))
            }
            None => Err(FormatError::UnknownOpcode {
                opcode,
                context: "a value",
            }
            .into()),
        }
    }

    /// Hands a complete value to the open frame.
    fn deliver(&mut self, value: Option<Box<dyn Reflect>>) -> Result<(), CodecError> {
        let Some(frame) = self.frames.last_mut() else {
            return Ok(());
        };

        match frame {
            Frame::Composite(frame) => match frame.phase {
                Phase::Properties => {
                    let field = self
                        .shapes
                        .get(frame.shape)
                        .and_then(|shape| shape.properties.get(frame.cursor))
                        .copied()
                        .flatten();
                    frame.cursor += 1;
                    if let (Some(field), Some(value)) = (field, value) {
                        assign(frame, field, value)?;
                    }
                }
                Phase::Items {
                    len,
                    next,
                    map,
                    acc_start,
                } => {
                    frame.phase = Phase::Items {
                        len,
                        next: next + 1,
                        map,
                        acc_start,
                    };
                    self.acc.extend(value);
                }
                Phase::AwaitEnd => {}
            },
            Frame::Sequence(frame) => {
                frame.next += 1;
                self.acc.extend(value);
            }
            Frame::Skip(frame) => match frame.phase {
                Phase::Properties => frame.cursor += 1,
                Phase::Items {
                    len,
                    next,
                    map,
                    acc_start,
                } => {
                    frame.phase = Phase::Items {
                        len,
                        next: next + 1,
                        map,
                        acc_start,
                    };
                }
                Phase::AwaitEnd => {}
            },
        }
        Ok(())
    }

    /// Wraps `value` into a handle if a `SHARED` marker preceded it.
    fn finish(
        &mut self,
        value: Box<dyn Reflect>,
        mark: Option<usize>,
        declared: Option<&'static TypeInfo>,
        env: &DeEnv<'_>,
    ) -> Result<Box<dyn Reflect>, CodecError> {
        let Some(index) = mark else {
            return Ok(value);
        };
        let handle = wrap(value, declared, env.registry)?;
        self.store(index, &*handle)?;
        Ok(handle)
    }

    fn store(&mut self, index: usize, handle: &dyn Reflect) -> Result<(), CodecError> {
        let copy = clone_handle(handle);
        match (self.objects.get_mut(index), copy) {
            (Some(slot), Some(copy)) => {
                *slot = Some(copy);
                Ok(())
            }
            _ => Err(FormatError::BadReference {
                cache: CacheKind::Object,
                index,
            }
            .into()),
        }
    }

    // -------------------------------------------------------------------------
    // Composites

    /// Reads a type header and registers its shape.
    ///
    /// An unregistered type path is an error unless the value is dropped.
    fn read_shape(
        &mut self,
        opcode: u8,
        src: &mut impl Source,
        discard: bool,
        env: &DeEnv<'_>,
    ) -> Result<usize, CodecError> {
        let shape = if opcode == wire::TYPE_START {
            let path = cache::expect_str(src, &mut self.strings, env.width, &mut self.scratch)?;
            let info = match env.registry.get_with_type_path(&path).map(TypeMeta::type_info) {
                Some(info) => Ok(info),
                None if discard => Err(path),
                None => return Err(TypeResolutionError::UnknownTypePath(path).into()),
            };

            let count = read_len(src)?;
            let mut properties = Vec::with_capacity(count.min(MAX_PREALLOC));
            for _ in 0..count {
                let name = cache::expect_str(src, &mut self.strings, env.width, &mut self.scratch)?;
                let field = match info {
                    Ok(TypeInfo::Struct(owner)) => owner.index_of(&name),
                    _ => None,
                };
                if let (None, Ok(owner)) = (field, &info) {
                    self.unknown_property(*owner, name, env.policy)?;
                }
                properties.push(field);
            }
            Shape {
                info,
                properties: properties.into_boxed_slice(),
            }
        } else {
            let print: [u8; FINGERPRINT_LEN] = src.read_array()?;
            let info = env
                .known
                .resolve(&print)
                .and_then(|type_id| env.registry.get_type_info(type_id))
                .ok_or(TypeResolutionError::UnknownFingerprint(print))?;
            let properties = match info {
                TypeInfo::Struct(info) => (0..info.field_len()).map(Some).collect(),
                _ => Box::default(),
            };
            Shape {
                info: Ok(info),
                properties,
            }
        };

        self.shapes.push(shape);
        Ok(self.shapes.len() - 1)
    }

    fn unknown_property(
        &mut self,
        info: &'static TypeInfo,
        property: String,
        policy: UnknownPropertyPolicy,
    ) -> Result<(), CodecError> {
        let mismatch = SchemaMismatch {
            type_path: info.type_path(),
            property,
        };
        match policy {
            UnknownPropertyPolicy::Reject => Err(mismatch.into()),
            UnknownPropertyPolicy::Drop => {
                log::warn!("{mismatch}, its values are dropped");
                self.dropped.push(mismatch);
                Ok(())
            }
        }
    }

    /// Builds the placeholder of a shape and opens a frame to fill it.
    ///
    /// A shared placeholder is stored in the object cache before any of its
    /// properties is read, so properties can refer back to it. A dropped
    /// value that can not be built is skipped instead.
    fn open(
        &mut self,
        shape: usize,
        mark: Option<usize>,
        declared: Option<&'static TypeInfo>,
        discard: bool,
        env: &DeEnv<'_>,
    ) -> Result<(), CodecError> {
        let skip = Frame::Skip(Skip {
            shape,
            cursor: 0,
            phase: Phase::Properties,
        });
        let info = match self.shapes.get(shape).map(|shape| &shape.info) {
            Some(Ok(info)) => *info,
            Some(Err(_)) if discard => {
                self.frames.push(skip);
                return Ok(());
            }
            Some(Err(path)) => return Err(TypeResolutionError::UnknownTypePath(path.clone()).into()),
            None => {
                return Err(FormatError::BadReference {
                    cache: CacheKind::Shape,
                    index: shape,
                }
                .into());
            }
        };

        let (target, shared) = match info {
            TypeInfo::Array(_) => (Target::Deferred, mark),
            _ => {
                let Some(constructor) = env.registry.get_type_trait::<TypeTraitDefault>(info.ty_id()) else {
                    if discard {
                        self.frames.push(skip);
                        return Ok(());
                    }
                    return Err(TypeResolutionError::MissingConstructor(info.type_path()).into());
                };
                let placeholder = constructor.default();
                match mark {
                    Some(index) => {
                        let handle = wrap(placeholder, declared, env.registry)?;
                        self.store(index, &*handle)?;
                        (Target::Shared(handle), None)
                    }
                    None => (Target::Owned(placeholder), None),
                }
            }
        };

        self.frames.push(Frame::Composite(Composite {
            info,
            target,
            shape,
            cursor: 0,
            phase: Phase::Properties,
            shared,
            declared,
        }));
        Ok(())
    }

    /// After the last property: the start of the items, or `TYPE_END`.
    fn properties_end(&mut self, opcode: u8, src: &mut impl Source, env: &DeEnv<'_>) -> Result<Flow, CodecError> {
        let map = match opcode {
            wire::TYPE_END => return self.type_end(env),
            wire::LIST_START => false,
            wire::MAP_START => true,
            _ => {
                return Err(FormatError::UnknownOpcode {
                    opcode,
                    context: "items or the end of a type",
                }
                .into());
            }
        };

        let frame = match self.frames.last_mut() {
            Some(Frame::Composite(frame)) => frame,
            Some(Frame::Skip(frame)) => {
                let count = read_len(src)?;
                let len = if map {
                    count.checked_mul(2).ok_or(FormatError::VarintOverflow)?
                } else {
                    count
                };
                frame.phase = Phase::Items {
                    len,
                    next: 0,
                    map,
                    acc_start: 0,
                };
                return Ok(Flow::Continue);
            }
            _ => return Err(FormatError::Traversal("items outside of a composite").into()),
        };
        let fits = match container_of(frame.info) {
            Some(TypeInfo::Map(_)) => map,
            Some(TypeInfo::List(_) | TypeInfo::Array(_)) => !map,
            _ => false,
        };
        if !fits {
            return Err(FormatError::UnknownOpcode {
                opcode,
                context: "the end of a type",
            }
            .into());
        }

        let count = read_len(src)?;
        let len = if map {
            count.checked_mul(2).ok_or(FormatError::VarintOverflow)?
        } else {
            count
        };
        self.acc.reserve(len.min(MAX_PREALLOC));
        frame.phase = Phase::Items {
            len,
            next: 0,
            map,
            acc_start: self.acc.len(),
        };
        Ok(Flow::Continue)
    }

    fn items_end(&mut self, opcode: u8, map: bool) -> Result<Flow, CodecError> {
        let end = if map { wire::MAP_END } else { wire::LIST_END };
        if opcode != end {
            return Err(FormatError::UnknownOpcode {
                opcode,
                context: "the end of the items",
            }
            .into());
        }

        let frame = match self.frames.last_mut() {
            Some(Frame::Composite(frame)) => frame,
            Some(Frame::Skip(frame)) => {
                frame.phase = Phase::AwaitEnd;
                return Ok(Flow::Continue);
            }
            _ => return Err(FormatError::Traversal("items outside of a composite").into()),
        };
        let Phase::Items { acc_start, .. } = frame.phase else {
            return Err(FormatError::Traversal("items end outside of the items").into());
        };
        frame.phase = Phase::AwaitEnd;

        let items = self.acc.split_off(acc_start);
        materialize(frame, items)?;
        Ok(Flow::Continue)
    }

    fn type_end(&mut self, env: &DeEnv<'_>) -> Result<Flow, CodecError> {
        let frame = match self.frames.pop() {
            Some(Frame::Composite(frame)) => frame,
            Some(Frame::Skip(_)) => return Ok(Flow::Value(None)),
            _ => return Err(FormatError::Traversal("type end outside of a composite").into()),
        };
        let value = match frame.target {
            Target::Owned(value) => self.finish(value, frame.shared, frame.declared, env)?,
            Target::Shared(handle) => handle,
            Target::Deferred => {
                return Err(FormatError::Unassignable {
                    expected: frame.info.type_path(),
                    found: "no items",
                }
                .into());
            }
        };
        Ok(Flow::Value(Some(value)))
    }

    // -------------------------------------------------------------------------
    // Tuples and pairs

    fn open_sequence(
        &mut self,
        opcode: u8,
        src: &mut impl Source,
        mark: Option<usize>,
        declared: Option<&'static TypeInfo>,
        discard: bool,
    ) -> Result<(), CodecError> {
        let pair = opcode == wire::PAIR_START;
        let arity = if pair { 2 } else { src.read_u8()? as usize };
        let inner = match mark {
            Some(_) => shared_inner(declared),
            None => declared,
        };

        let info = match inner.map(peel_option) {
            Some(info @ TypeInfo::Tuple(tuple)) if !pair => {
                if tuple.field_len() != arity {
                    return Err(TypeResolutionError::TypeMismatch {
                        expected: info.type_path(),
                        found: alloc::format!("a tuple of {arity}"),
                    }
                    .into());
                }
                Some(info)
            }
            Some(info @ TypeInfo::Pair(_)) if pair => Some(info),
            None | Some(TypeInfo::Dynamic(_)) if discard => None,
            None | Some(TypeInfo::Dynamic(_)) => return Err(TypeResolutionError::UndeclaredTuple.into()),
            Some(info) => {
                return Err(TypeResolutionError::TypeMismatch {
                    expected: info.type_path(),
                    found: String::from(if pair { "a pair" } else { "a tuple" }),
                }
                .into());
            }
        };

        self.frames.push(Frame::Sequence(Sequence {
            info,
            pair,
            arity,
            next: 0,
            acc_start: self.acc.len(),
            shared: mark,
            declared,
        }));
        Ok(())
    }

    fn sequence_end(&mut self, env: &DeEnv<'_>) -> Result<Flow, CodecError> {
        let Some(Frame::Sequence(frame)) = self.frames.pop() else {
            return Err(FormatError::Traversal("sequence end outside of a sequence").into());
        };

        let mut parts = self.acc.split_off(frame.acc_start);
        let Some(info) = frame.info else {
            return Ok(Flow::Value(None));
        };
        let value = match info {
            TypeInfo::Tuple(tuple) => tuple.from_parts(parts),
            TypeInfo::Pair(pair) => match (parts.pop(), parts.pop()) {
                (Some(value), Some(key)) => pair.from_parts(key, value),
                _ => None,
            },
            _ => None,
        };
        let value = value.ok_or(FormatError::Unassignable {
            expected: info.type_path(),
            found: "its decoded parts",
        })?;

        let value = self.finish(value, frame.shared, frame.declared, env)?;
        Ok(Flow::Value(Some(value)))
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn field_info(owner: &'static TypeInfo, field: usize) -> Option<&'static TypeInfo> {
    match owner {
        TypeInfo::Struct(info) => info.field_at(field).map(|field| field.type_info()),
        _ => None,
    }
}

fn clone_handle(handle: &dyn Reflect) -> Option<Box<dyn Reflect>> {
    match handle.reflect_ref() {
        ReflectRef::Shared(handle) => Some(handle.clone_handle()),
        _ => None,
    }
}

fn unassignable(expected: &'static str, found: &dyn Reflect) -> CodecError {
    FormatError::Unassignable {
        expected,
        found: found.reflect_type_path(),
    }
    .into()
}

/// What a null decodes to in a slot of type `declared`.
fn null_value(declared: Option<&'static TypeInfo>) -> Result<Box<dyn Reflect>, CodecError> {
    match declared {
        Some(TypeInfo::Option(info)) => Ok(info.none()),
        Some(TypeInfo::Leaf(info)) => zero_value(info.kind())
            .map(LeafValue::into_reflect)
            .ok_or_else(|| FormatError::UnexpectedNull { expected: info.type_path() }.into()),
        Some(info) => Err(FormatError::UnexpectedNull {
            expected: info.type_path(),
        }
        .into()),
        None => Err(FormatError::UnexpectedNull {
            expected: "an undeclared value",
        }
        .into()),
    }
}

/// Moves `value` into a new `Shared` handle.
///
/// The declared `Shared<T>` decides the handle type; a slot without one
/// (e.g. `Box<dyn Reflect>`) uses the registration of the value's type.
fn wrap(
    value: Box<dyn Reflect>,
    declared: Option<&'static TypeInfo>,
    registry: &TypeRegistry,
) -> Result<Box<dyn Reflect>, CodecError> {
    let found = (*value).reflect_type_path();
    match declared.map(peel_option) {
        Some(TypeInfo::Shared(info)) => info.wrap(value).map_err(|value| unassignable(info.type_path(), &*value)),
        _ => registry
            .get_type_trait::<TypeTraitShared>((*value).ty_id())
            .ok_or(FormatError::Unassignable {
                expected: "a shared handle",
                found,
            })?
            .wrap(value)
            .map_err(|value| unassignable("a shared handle", &*value)),
    }
}

/// Sets property `field` of the open composite.
fn assign(frame: &mut Composite, field: usize, value: Box<dyn Reflect>) -> Result<(), CodecError> {
    let found = (*value).reflect_type_path();
    let expected = field_info(frame.info, field).map_or(frame.info.type_path(), TypeInfo::type_path);

    let assigned = frame.target.with(move |placeholder| match placeholder.reflect_mut() {
        ReflectMut::Struct(s) => s.field_at_mut(field).is_some_and(|slot| slot.set(value).is_ok()),
        _ => false,
    });
    match assigned {
        Some(true) => Ok(()),
        _ => Err(FormatError::Unassignable { expected, found }.into()),
    }
}

/// Moves the decoded items into the list, array or map of the composite.
fn materialize(frame: &mut Composite, items: Vec<Box<dyn Reflect>>) -> Result<(), CodecError> {
    let Some(container) = container_of(frame.info) else {
        return Err(FormatError::Traversal("items of a type without a container").into());
    };

    if let Target::Deferred = frame.target {
        let TypeInfo::Array(info) = container else {
            return Err(FormatError::Traversal("a deferred value that is not an array").into());
        };
        let value = info.from_items(items).ok_or(FormatError::Unassignable {
            expected: info.type_path(),
            found: "its decoded items",
        })?;
        frame.target = Target::Owned(value);
        return Ok(());
    }

    let in_field = matches!(frame.info, TypeInfo::Struct(_));
    frame
        .target
        .with(move |value| {
            let value = if in_field {
                match value.reflect_mut() {
                    ReflectMut::Struct(s) => s.items_mut(),
                    _ => None,
                }
            } else {
                Some(value)
            };
            match value {
                Some(value) => fill(value, container, items),
                None => Err(FormatError::Traversal("a planned items field is missing").into()),
            }
        })
        .unwrap_or_else(|| Err(FormatError::Traversal("a placeholder is not reachable").into()))
}

fn fill(container: &mut dyn Reflect, info: &'static TypeInfo, items: Vec<Box<dyn Reflect>>) -> Result<(), CodecError> {
    if let TypeInfo::Array(info) = info {
        let array = info.from_items(items).ok_or(FormatError::Unassignable {
            expected: info.type_path(),
            found: "its decoded items",
        })?;
        return container
            .set(array)
            .map_err(|array| unassignable(info.type_path(), &*array));
    }

    let expected = info.type_path();
    match container.reflect_mut() {
        ReflectMut::List(list) => {
            list.reserve(items.len());
            for item in items {
                list.push(item).map_err(|item| unassignable(expected, &*item))?;
            }
        }
        ReflectMut::Map(map) => {
            map.reserve(items.len() / 2);
            let mut items = items.into_iter();
            while let (Some(key), Some(value)) = (items.next(), items.next()) {
                map.insert_boxed(key, value)
                    .map_err(|(key, _)| unassignable(expected, &*key))?;
            }
        }
        _ => return Err(FormatError::Traversal("items of a value that is not a container").into()),
    }
    Ok(())
}
