//! The deserializer automaton.
//!
//! Opcodes are consumed one at a time against an explicit stack of frames,
//! one per open composite, tuple or pair. Each frame knows the declared type
//! of its next slot, which is how nulls, tuples and shared leaves are turned
//! into values of the right type.
//!
//! Composites are filled in place: the placeholder is built from the
//! registry before any property is read, and a shared placeholder enters the
//! object cache right away. A property that refers back to the object being
//! decoded therefore resolves to the same handle.

// -----------------------------------------------------------------------------
// Modules

mod frame;
mod session;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use session::{DeEnv, DeSession};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DeEnv, DeSession};
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::sync::RwLock;

    use tg_reflect::derive::Reflect;
    use tg_reflect::info::{TypeInfo, Typed};
    use tg_reflect::registry::{GetTypeMeta, TypeRegistry};
    use tg_reflect::{FromReflect, Reflect, Shared};
    use tg_utils::pool::Recycle;

    use crate::config::{CacheWidth, UnknownPropertyPolicy};
    use crate::error::{CacheKind, CodecError, FormatError, TypeResolutionError};
    use crate::known::KnownTypes;
    use crate::ser::{SerEnv, SerSession};
    use crate::source::SliceSource;
    use crate::wire;

    #[derive(Reflect, Default)]
    #[reflect(type_path = "tests::de::Person")]
    struct Person {
        first_name: String,
        last_name: String,
        age: i32,
        brother: Option<Shared<Person>>,
    }

    #[derive(Reflect, Default)]
    #[reflect(type_path = "tests::de::Node")]
    struct Node {
        value: i32,
        next: Option<Shared<Node>>,
    }

    #[derive(Reflect)]
    #[reflect(type_path = "tests::de::Counter")]
    struct Counter {
        hits: u32,
        label: Option<String>,
    }

    impl Default for Counter {
        fn default() -> Self {
            Self {
                hits: 5,
                label: Some(String::from("unset")),
            }
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(type_path = "tests::de::Team")]
    struct Team {
        name: String,
        #[reflect(items)]
        members: Vec<Person>,
    }

    #[derive(Reflect)]
    #[reflect(type_path = "tests::de::Envelope")]
    struct Envelope {
        body: Box<dyn Reflect>,
    }

    impl Default for Envelope {
        fn default() -> Self {
            Self { body: Box::new(0_u8) }
        }
    }

    mod v1 {
        use tg_reflect::derive::Reflect;

        #[derive(Reflect, Default)]
        #[reflect(type_path = "tests::de::Drift")]
        pub struct Drift {
            pub id: u64,
        }
    }

    mod v2 {
        use alloc::string::String;
        use tg_reflect::derive::Reflect;

        #[derive(Reflect, Default)]
        #[reflect(type_path = "tests::de::Drift")]
        pub struct Drift {
            pub id: u64,
            pub nickname: String,
        }
    }

    const WRITER: SerEnv<'static> = SerEnv {
        width: CacheWidth::Narrow,
        known: None,
        tuples: true,
    };

    /// The opcodes of `value`, without the mode byte.
    fn encode(value: &dyn Reflect) -> Vec<u8> {
        let mut session = SerSession::default();
        session.write(value, None, &WRITER).unwrap();
        session.payload()[1..].to_vec()
    }

    fn person(first_name: &str) -> Person {
        Person {
            first_name: String::from(first_name),
            last_name: String::from("Redondo"),
            age: 33,
            brother: None,
        }
    }

    struct Reader {
        registry: TypeRegistry,
        known: KnownTypes,
        policy: UnknownPropertyPolicy,
        session: DeSession,
    }

    impl Reader {
        fn new() -> Self {
            Self {
                registry: TypeRegistry::new(),
                known: KnownTypes::default(),
                policy: UnknownPropertyPolicy::Drop,
                session: DeSession::default(),
            }
        }

        fn register<T: GetTypeMeta>(mut self) -> Self {
            self.registry.register::<T>();
            self
        }

        fn read(&mut self, bytes: &[u8], declared: Option<&'static TypeInfo>) -> Result<Option<Box<dyn Reflect>>, CodecError> {
            self.session.reset();
            let env = DeEnv {
                width: CacheWidth::Narrow,
                registry: &self.registry,
                known: &self.known,
                policy: self.policy,
            };
            let mut src = SliceSource::new(bytes);
            let value = self.session.read(&mut src, declared, &env)?;
            assert!(src.remaining().is_empty());
            Ok(value)
        }

        fn value<T: FromReflect + Typed>(&mut self, bytes: &[u8]) -> T {
            let value = self.read(bytes, Some(T::type_info())).unwrap().unwrap();
            T::from_reflect(value).unwrap()
        }
    }

    #[test]
    fn scenario_a_round_trip() {
        let mut reader = Reader::new().register::<Person>();
        let decoded: Person = reader.value(&encode(&person("Daniel")));

        assert_eq!(decoded.first_name, "Daniel");
        assert_eq!(decoded.last_name, "Redondo");
        assert_eq!(decoded.age, 33);
        assert!(decoded.brother.is_none());
    }

    #[test]
    fn shared_instances_stay_shared() {
        let first: Shared<Person> = Arc::new(RwLock::new(person("Ann")));
        let second: Shared<Person> = Arc::new(RwLock::new(Person {
            brother: Some(first.clone()),
            ..person("Bob")
        }));
        let bytes = encode(&vec![first, second]);

        let mut reader = Reader::new().register::<Vec<Shared<Person>>>();
        let decoded: Vec<Shared<Person>> = reader.value(&bytes);

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].read().unwrap().first_name, "Ann");
        let brother = decoded[1].read().unwrap().brother.clone().unwrap();
        assert!(Arc::ptr_eq(&brother, &decoded[0]));
    }

    #[test]
    fn cycles_resolve_to_the_placeholder() {
        let node: Shared<Node> = Arc::new(RwLock::new(Node { value: 7, next: None }));
        node.write().unwrap().next = Some(node.clone());
        let bytes = encode(&node);
        node.write().unwrap().next = None;

        let mut reader = Reader::new().register::<Shared<Node>>();
        let decoded: Shared<Node> = reader.value(&bytes);

        let next = decoded.read().unwrap().next.clone().unwrap();
        assert!(Arc::ptr_eq(&next, &decoded));
        assert_eq!(decoded.read().unwrap().value, 7);
        decoded.write().unwrap().next = None;
    }

    #[test]
    fn shared_leaves() {
        let name: Shared<String> = Arc::new(RwLock::new(String::from("n")));
        let bytes = encode(&vec![name.clone(), name]);
        assert_eq!(bytes.iter().filter(|&&b| b == wire::SHARED).count(), 1);

        let mut reader = Reader::new().register::<Vec<Shared<String>>>();
        let decoded: Vec<Shared<String>> = reader.value(&bytes);
        assert!(Arc::ptr_eq(&decoded[0], &decoded[1]));
        assert_eq!(*decoded[0].read().unwrap(), "n");
    }

    #[test]
    fn null_root() {
        let mut reader = Reader::new();
        assert!(reader.read(&[wire::NULL], None).unwrap().is_none());
        assert!(reader.read(&[wire::NULL], Some(<u32>::type_info())).unwrap().is_none());
    }

    #[test]
    fn null_properties_reset_the_placeholder() {
        let bytes = encode(&Counter { hits: 0, label: None });
        assert!(bytes.ends_with(&[wire::NULL, wire::NULL, wire::TYPE_END]));

        let mut reader = Reader::new().register::<Counter>();
        let decoded: Counter = reader.value(&bytes);
        assert_eq!(decoded.hits, 0);
        assert_eq!(decoded.label, None);
    }

    #[test]
    fn containers_round_trip() {
        let mut reader = Reader::new()
            .register::<[u16; 3]>()
            .register::<BTreeMap<String, i64>>()
            .register::<Team>()
            .register::<Vec<i32>>();

        let array: [u16; 3] = reader.value(&encode(&[1_u16, 300, 0]));
        assert_eq!(array, [1, 300, 0]);

        let mut map = BTreeMap::new();
        map.insert(String::from("a"), -1_i64);
        map.insert(String::from("b"), 1 << 40);
        let decoded: BTreeMap<String, i64> = reader.value(&encode(&map));
        assert_eq!(decoded, map);

        let team = Team {
            name: String::from("core"),
            members: vec![person("Ann"), person("Bob")],
        };
        let decoded: Team = reader.value(&encode(&team));
        assert_eq!(decoded.name, "core");
        let names: Vec<&str> = decoded.members.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, ["Ann", "Bob"]);

        let empty: Vec<i32> = reader.value(&encode(&Vec::<i32>::new()));
        assert!(empty.is_empty());
    }

    #[test]
    fn tuples_need_a_declared_type() {
        let bytes = encode(&(1_i32, String::from("x")));
        let mut reader = Reader::new();

        let err = reader.read(&bytes, None).unwrap_err();
        assert!(matches!(err, CodecError::TypeResolution(TypeResolutionError::UndeclaredTuple)));

        let value: (i32, String) = reader.value(&bytes);
        assert_eq!(value, (1, String::from("x")));

        let err = reader.read(&bytes, Some(<(i32, String, bool)>::type_info())).unwrap_err();
        assert!(matches!(err, CodecError::TypeResolution(TypeResolutionError::TypeMismatch { .. })));
    }

    #[test]
    fn dynamic_slots_keep_the_runtime_type() {
        let mut reader = Reader::new().register::<Envelope>().register::<Person>();

        let decoded: Envelope = reader.value(&encode(&Envelope {
            body: Box::new(person("Bob")),
        }));
        let body = (*decoded.body).downcast_ref::<Person>().unwrap();
        assert_eq!(body.first_name, "Bob");

        let shared: Shared<Person> = Arc::new(RwLock::new(person("Ann")));
        let decoded: Envelope = reader.value(&encode(&Envelope { body: Box::new(shared) }));
        let handle = (*decoded.body).downcast_ref::<Shared<Person>>().unwrap();
        assert_eq!(handle.read().unwrap().first_name, "Ann");

        let bytes = encode(&Envelope {
            body: Box::new((1_u8, 2_u8)),
        });
        let err = reader.read(&bytes, None).unwrap_err();
        assert!(matches!(err, CodecError::TypeResolution(TypeResolutionError::UndeclaredTuple)));
    }

    #[test]
    fn unknown_properties_follow_the_policy() {
        let bytes = encode(&v2::Drift {
            id: 9,
            nickname: String::from("x"),
        });
        let mut reader = Reader::new().register::<v1::Drift>();

        let decoded: v1::Drift = reader.value(&bytes);
        assert_eq!(decoded.id, 9);
        let dropped = reader.session.take_dropped();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].type_path, "tests::de::Drift");
        assert_eq!(dropped[0].property, "nickname");

        reader.policy = UnknownPropertyPolicy::Reject;
        let err = reader.read(&bytes, None).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch(ref m) if m.property == "nickname"));
    }

    #[test]
    fn malformed_streams() {
        let mut reader = Reader::new();

        let err = reader.read(&[wire::OBJECT_REF_0 + 2], None).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::BadReference {
                cache: CacheKind::Object,
                index: 2
            })
        ));

        let err = reader.read(&[wire::SHAPE_REF, 40], None).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::BadReference {
                cache: CacheKind::Shape,
                index: 40
            })
        ));

        let err = reader.read(&[0xFF], None).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::UnknownOpcode { opcode: 0xFF, .. })
        ));

        let bytes = encode(&person("Ann"));
        let err = reader.read(&bytes, None).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeResolution(TypeResolutionError::UnknownTypePath(ref path)) if path == "tests::de::Person"
        ));

        let mut reader = reader.register::<Person>();
        let err = reader.read(&bytes[..bytes.len() - 1], None).unwrap_err();
        assert!(matches!(err, CodecError::Format(FormatError::Truncated)));
    }

    #[test]
    fn recycled_session_forgets_objects() {
        let value: Shared<i32> = Arc::new(RwLock::new(3));
        let bytes = encode(&value);
        let mut reader = Reader::new().register::<Shared<i32>>();

        let decoded: Shared<i32> = reader.value(&bytes);
        assert_eq!(*decoded.read().unwrap(), 3);

        let err = reader.read(&[wire::OBJECT_REF_0], None).unwrap_err();
        assert!(matches!(err, CodecError::Format(FormatError::BadReference { .. })));
    }
}
