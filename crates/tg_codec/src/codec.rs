use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::io::{Read, Write};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use tg_reflect::info::TypeInfo;
use tg_reflect::registry::{GetTypeMeta, TypeRegistry};
use tg_reflect::{FromReflect, Reflect};
use tg_utils::pool::Pool;

use crate::compress;
use crate::config::{CacheWidth, CodecConfig};
use crate::de::{DeEnv, DeSession};
use crate::error::{CodecError, FormatError, TypeResolutionError};
use crate::known::KnownTypes;
use crate::plan::{Plan, PlanCache};
use crate::report::DecodeReport;
use crate::ser::{SerEnv, SerSession};
use crate::source::{ReadSource, SliceSource, Source};
use crate::wire;

// -----------------------------------------------------------------------------
// Codec

/// Encodes and decodes reflected object graphs.
///
/// A codec owns its type registry, its known types and pools of sessions,
/// and is meant to be created once and shared. Calls only take read locks
/// and may run concurrently; each call works on its own pooled session, so
/// back-reference indices never leak from one call into another.
///
/// # Examples
///
/// ```
/// use tg_codec::{Codec, CodecConfig};
/// use tg_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let codec = Codec::new(CodecConfig::full());
/// let bytes = codec.to_bytes(&Point { x: 3, y: -4 }).unwrap();
/// let back: Option<Point> = codec.from_bytes(&bytes).unwrap();
/// assert_eq!(back, Some(Point { x: 3, y: -4 }));
/// ```
pub struct Codec {
    config: CodecConfig,
    registry: RwLock<TypeRegistry>,
    known: RwLock<KnownTypes>,
    ser_sessions: Pool<SerSession>,
    de_sessions: Pool<DeSession>,
    buffers: Pool<Vec<u8>>,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("config", &self.config)
            .field("idle_ser_sessions", &self.ser_sessions.idle())
            .field("idle_de_sessions", &self.de_sessions.idle())
            .finish_non_exhaustive()
    }
}

impl Default for Codec {
    #[inline]
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl Codec {
    /// Creates a codec with an empty registry.
    ///
    /// Types are registered on demand by [`deserialize`](Self::deserialize);
    /// types only reachable through `Box<dyn Reflect>` must be registered
    /// with [`register`](Self::register).
    #[inline]
    pub fn new(config: CodecConfig) -> Self {
        Self::with_registry(config, TypeRegistry::new())
    }

    pub fn with_registry(config: CodecConfig, registry: TypeRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            known: RwLock::new(KnownTypes::default()),
            ser_sessions: Pool::new(config.pool_capacity),
            de_sessions: Pool::new(config.pool_capacity),
            buffers: Pool::new(config.pool_capacity),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Registers `T` and the types it is built from.
    pub fn register<T: GetTypeMeta>(&self) {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register::<T>();
    }

    /// Registers `T` and encodes it by the fingerprint of its type path.
    ///
    /// Both ends must add the same known types. Fingerprints are only
    /// written when [`CodecConfig::known_types`] is set, but always read.
    pub fn add_known_type<T: GetTypeMeta>(&self) {
        self.register::<T>();
        let info = T::type_info();
        self.known
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(info.ty_id(), info.type_path());
    }

    /// Read access to the registry.
    ///
    /// Hold the guard briefly: registering types waits for it.
    #[inline]
    pub fn registry(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The compiled plan of `info`, `None` for `Box<dyn Reflect>`.
    ///
    /// `Option` and `Shared` wrappers are looked through.
    #[inline]
    pub fn plan_for(&self, info: &'static TypeInfo) -> Option<Arc<Plan>> {
        PlanCache::global().get(info)
    }

    fn ensure_registered<T: GetTypeMeta>(&self) {
        if !self.registry().contains(T::type_info().ty_id()) {
            self.register::<T>();
        }
    }

    // -------------------------------------------------------------------------
    // Serialize

    /// Writes `value` to `writer`.
    #[inline]
    pub fn serialize(&self, writer: &mut impl Write, value: &dyn Reflect) -> Result<(), CodecError> {
        self.serialize_declared(writer, value, None)
    }

    /// Writes `value`, starting from the plan of `declared`.
    ///
    /// The wire always carries the runtime type. The declared type only
    /// saves a plan lookup when it matches.
    pub fn serialize_declared(
        &self,
        writer: &mut impl Write,
        value: &dyn Reflect,
        declared: Option<&'static TypeInfo>,
    ) -> Result<(), CodecError> {
        let hint = declared.and_then(|info| PlanCache::global().get(info));
        let known = self.known.read().unwrap_or_else(PoisonError::into_inner);
        let env = SerEnv {
            width: self.config.cache_width,
            known: (self.config.known_types && !known.is_empty()).then_some(&*known),
            tuples: self.config.tuples,
        };

        let mut session = self.ser_sessions.acquire();
        session.write(value, hint, &env)?;
        drop(known);
        self.emit(writer, session.payload())
    }

    /// Writes a stream holding a single null.
    pub fn serialize_null(&self, writer: &mut impl Write) -> Result<(), CodecError> {
        let mut session = self.ser_sessions.acquire();
        session.write_null(self.config.cache_width);
        self.emit(writer, session.payload())
    }

    /// Encodes `value` into a new buffer.
    pub fn to_bytes(&self, value: &dyn Reflect) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.serialize(&mut out, value)?;
        Ok(out)
    }

    fn emit(&self, writer: &mut impl Write, payload: &[u8]) -> Result<(), CodecError> {
        match self.config.compression {
            Some(compression) if payload.len() > compression.threshold => {
                let mut block = self.buffers.acquire();
                compress::compress_block(payload, &mut block)?;
                writer.write_all(&[wire::FORMAT_COMPRESSED])?;
                writer.write_all(&(block.len() as u32).to_le_bytes())?;
                writer.write_all(&block)?;
            }
            _ => {
                writer.write_all(&[wire::FORMAT_PLAIN])?;
                writer.write_all(payload)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Deserialize

    /// Reads one value of type `T`, `None` if the stream holds a null.
    ///
    /// `T` is registered first if needed. Exactly the bytes of the value are
    /// consumed from `reader`.
    pub fn deserialize<T: FromReflect + GetTypeMeta>(&self, reader: &mut impl Read) -> Result<Option<T>, CodecError> {
        self.ensure_registered::<T>();
        let Some(value) = self.deserialize_value(reader, Some(T::type_info()))? else {
            return Ok(None);
        };
        T::from_reflect(value).map(Some).map_err(|value| {
            TypeResolutionError::TypeMismatch {
                expected: T::type_path(),
                found: (*value).reflect_type_path().to_string(),
            }
            .into()
        })
    }

    /// Reads one value, `None` if the stream holds a null.
    ///
    /// `declared` is needed for tuples, pairs and shared leaves at the root,
    /// whose types are not on the wire.
    #[inline]
    pub fn deserialize_value(
        &self,
        reader: &mut impl Read,
        declared: Option<&'static TypeInfo>,
    ) -> Result<Option<Box<dyn Reflect>>, CodecError> {
        self.deserialize_with_report(reader, declared).map(|(value, _)| value)
    }

    /// Reads one value and reports the properties that were dropped.
    pub fn deserialize_with_report(
        &self,
        reader: &mut impl Read,
        declared: Option<&'static TypeInfo>,
    ) -> Result<(Option<Box<dyn Reflect>>, DecodeReport), CodecError> {
        let mut src = ReadSource::new(reader);
        match src.read_u8()? {
            wire::FORMAT_PLAIN => self.decode(&mut src, declared),
            wire::FORMAT_COMPRESSED => {
                let mut block = self.buffers.acquire();
                let mut raw = self.buffers.acquire();
                compress::read_block(&mut src, &mut block, &mut raw)?;

                let mut src = SliceSource::new(&raw);
                let out = self.decode(&mut src, declared)?;
                if !src.remaining().is_empty() {
                    return Err(FormatError::Compression("bytes left after the root value".into()).into());
                }
                Ok(out)
            }
            actual => Err(FormatError::Header {
                context: "format marker",
                expected: wire::FORMAT_PLAIN,
                actual,
            }
            .into()),
        }
    }

    /// Decodes `bytes`, which must hold exactly one value.
    pub fn from_bytes<T: FromReflect + GetTypeMeta>(&self, bytes: &[u8]) -> Result<Option<T>, CodecError> {
        self.deserialize(&mut &*bytes)
    }

    fn decode(
        &self,
        src: &mut impl Source,
        declared: Option<&'static TypeInfo>,
    ) -> Result<(Option<Box<dyn Reflect>>, DecodeReport), CodecError> {
        let mode = src.read_u8()?;
        let width = CacheWidth::from_mode_byte(mode).ok_or(FormatError::Header {
            context: "mode byte",
            expected: self.config.cache_width.mode_byte(),
            actual: mode,
        })?;

        let registry = self.registry();
        let known = self.known.read().unwrap_or_else(PoisonError::into_inner);
        let env = DeEnv {
            width,
            registry: &registry,
            known: &known,
            policy: self.config.unknown_properties,
        };

        let mut session = self.de_sessions.acquire();
        let value = session.read(src, declared, &env)?;
        Ok((value, DecodeReport::new(session.take_dropped())))
    }
}

#[cfg(test)]
mod tests {
    use super::Codec;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use tg_reflect::derive::Reflect;
    use tg_reflect::info::Typed;

    use crate::config::{CodecConfig, Compression};
    use crate::error::{CodecError, FormatError};
    use crate::wire;

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(type_path = "tests::codec::Label")]
    struct Label {
        text: String,
        weight: u32,
    }

    #[test]
    fn sessions_return_to_their_pools() {
        let codec = Codec::new(CodecConfig::full());
        let bytes = codec.to_bytes(&Label::default()).unwrap();
        assert_eq!(codec.ser_sessions.idle(), 1);

        let err = codec.from_bytes::<Label>(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, CodecError::Format(FormatError::Truncated)));
        assert_eq!(codec.de_sessions.idle(), 1);

        let back = codec.from_bytes::<Label>(&bytes).unwrap();
        assert_eq!(back, Some(Label::default()));
        assert_eq!(codec.de_sessions.idle(), 1);
    }

    #[test]
    fn compressed_buffers_are_pooled() {
        let config = CodecConfig::full().with_compression(Some(Compression { threshold: 16 }));
        let codec = Codec::new(config);
        let value = Label {
            text: "abc".repeat(40),
            weight: 7,
        };

        let bytes = codec.to_bytes(&value).unwrap();
        assert_eq!(bytes[0], wire::FORMAT_COMPRESSED);
        assert_eq!(codec.buffers.idle(), 1);

        assert_eq!(codec.from_bytes::<Label>(&bytes).unwrap(), Some(value));
        assert_eq!(codec.buffers.idle(), 2);
    }

    #[test]
    fn declared_types_only_seed_the_plan() {
        let codec = Codec::new(CodecConfig::portable());
        let label = Label {
            text: "x".into(),
            weight: 3,
        };

        let mut hinted = Vec::new();
        codec
            .serialize_declared(&mut hinted, &label, Some(<Option<Label>>::type_info()))
            .unwrap();
        let mut mismatched = Vec::new();
        codec
            .serialize_declared(&mut mismatched, &label, Some(<u64>::type_info()))
            .unwrap();

        assert_eq!(hinted, codec.to_bytes(&label).unwrap());
        assert_eq!(mismatched, hinted);
        assert_eq!(codec.from_bytes::<Label>(&hinted).unwrap(), Some(label));
    }

    #[test]
    fn pool_capacity_bounds_idle_sessions() {
        let codec = Codec::new(CodecConfig::portable().with_pool_capacity(0));
        codec.to_bytes(&vec![1_u8, 2, 3]).unwrap();
        assert_eq!(codec.ser_sessions.idle(), 0);
    }
}
