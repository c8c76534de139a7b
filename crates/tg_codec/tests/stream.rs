use std::any::TypeId;
use std::sync::{Arc, RwLock};
use std::thread;

use tg_codec::{
    CacheKind, CacheWidth, Codec, CodecConfig, CodecError, Compression, FormatError, PlanCache, TypeResolutionError,
    UnknownPropertyPolicy, fingerprint, wire,
};
use tg_reflect::derive::Reflect;
use tg_reflect::info::Typed;
use tg_reflect::{KeyValue, Shared};

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(type_path = "it::Sample")]
struct Sample {
    id: u64,
    name: String,
    values: Vec<u64>,
}

mod v1 {
    use tg_reflect::Shared;
    use tg_reflect::derive::Reflect;

    use super::Sample;

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(type_path = "it::Profile")]
    pub struct Profile {
        pub id: u32,
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(type_path = "it::Ledger")]
    pub struct Ledger {
        pub id: u32,
        pub keep: Option<Shared<Sample>>,
        pub tail: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(type_path = "it::Team")]
    pub struct Team {
        pub lead: Profile,
        pub size: u8,
    }
}

mod v2 {
    use std::collections::BTreeMap;

    use tg_reflect::derive::Reflect;
    use tg_reflect::{KeyValue, Shared};

    use super::Sample;

    #[derive(Reflect, Default, Debug)]
    #[reflect(type_path = "it::Profile")]
    pub struct Profile {
        pub id: u32,
        pub nickname: String,
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(type_path = "it::Extra")]
    pub struct Extra {
        pub note: String,
        pub marks: Vec<u32>,
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(type_path = "it::Ledger")]
    pub struct Ledger {
        pub id: u32,
        pub span: (i32, i32),
        pub entry: KeyValue<u8, String>,
        pub extra: Extra,
        pub buddy: Option<Shared<Extra>>,
        pub counts: BTreeMap<String, i32>,
        pub sample: Option<Shared<Sample>>,
        pub keep: Option<Shared<Sample>>,
        pub tail: String,
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(type_path = "it::Team")]
    pub struct Team {
        pub lead: Profile,
        pub size: u8,
    }
}

fn sample(len: u64) -> Sample {
    Sample {
        id: 9,
        name: "sensor".into(),
        values: (0..len).map(|i| i * 1_000_003).collect(),
    }
}

#[test]
fn foreign_header_names_both_bytes() {
    let codec = Codec::new(CodecConfig::full());
    let mut bytes = codec.to_bytes(&sample(3)).unwrap();
    bytes[0] = 0x7B;

    let err = codec.from_bytes::<Sample>(&bytes).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Format(FormatError::Header {
            context: "format marker",
            expected: wire::FORMAT_PLAIN,
            actual: 0x7B,
        })
    ));
    assert_eq!(err.to_string(), "expected format marker 0xc5, found 0x7b");

    let err = codec.from_bytes::<Sample>(&[wire::FORMAT_PLAIN, 0x09]).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Format(FormatError::Header {
            context: "mode byte",
            actual: 0x09,
            ..
        })
    ));

    let err = codec.from_bytes::<Sample>(&[]).unwrap_err();
    assert!(matches!(err, CodecError::Format(FormatError::Truncated)));
}

#[test]
fn large_payloads_are_compressed() {
    let config = CodecConfig::full().with_compression(Some(Compression { threshold: 1024 }));
    let codec = Codec::new(config);
    let value = sample(2_000);

    let bytes = codec.to_bytes(&value).unwrap();
    assert_eq!(bytes[0], wire::FORMAT_COMPRESSED);
    let block_len = u32::from_le_bytes(bytes[1..5].try_into().unwrap()) as usize;
    assert_eq!(block_len, bytes.len() - 5);

    assert_eq!(codec.from_bytes::<Sample>(&bytes).unwrap(), Some(value));

    // Under the threshold the payload stays plain.
    let small = codec.to_bytes(&sample(2)).unwrap();
    assert_eq!(small[0], wire::FORMAT_PLAIN);
}

#[test]
fn readers_accept_any_profile() {
    let full = Codec::new(CodecConfig::full().with_compression(Some(Compression { threshold: 0 })));
    let portable = Codec::new(CodecConfig::portable());
    let value = sample(40);

    let bytes = full.to_bytes(&value).unwrap();
    assert_eq!(portable.from_bytes::<Sample>(&bytes).unwrap(), Some(value.clone()));

    let bytes = portable.to_bytes(&value).unwrap();
    assert_eq!(bytes[1], wire::MODE_NARROW);
    assert_eq!(full.from_bytes::<Sample>(&bytes).unwrap(), Some(value));
}

#[test]
fn reads_stop_at_the_end_of_the_value() {
    let config = CodecConfig::full().with_compression(Some(Compression { threshold: 64 }));
    let codec = Codec::new(config);
    let (first, second) = (sample(2), sample(100));

    let mut stream = Vec::new();
    codec.serialize(&mut stream, &first).unwrap();
    codec.serialize(&mut stream, &second).unwrap();
    codec.serialize_null(&mut stream).unwrap();
    stream.extend_from_slice(b"tail");

    let mut reader = &stream[..];
    assert_eq!(codec.deserialize::<Sample>(&mut reader).unwrap(), Some(first));
    assert_eq!(codec.deserialize::<Sample>(&mut reader).unwrap(), Some(second));
    assert_eq!(codec.deserialize::<Sample>(&mut reader).unwrap(), None);
    assert_eq!(reader, b"tail");
}

#[test]
fn calls_do_not_share_back_references() {
    let codec = Codec::new(CodecConfig::portable());
    let value = sample(5);

    let first = codec.to_bytes(&value).unwrap();
    let second = codec.to_bytes(&value).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[2], wire::TYPE_START);

    let codec = Arc::new(codec);
    thread::scope(|scope| {
        for _ in 0..4 {
            let codec = codec.clone();
            let (value, expected) = (&value, &first);
            scope.spawn(move || {
                for _ in 0..50 {
                    let bytes = codec.to_bytes(value).unwrap();
                    assert_eq!(&bytes, expected);
                    assert_eq!(codec.from_bytes::<Sample>(&bytes).unwrap().as_ref(), Some(value));
                }
            });
        }
    });
}

#[test]
fn plans_are_compiled_once() {
    let codec = Codec::new(CodecConfig::portable());
    let first = codec.plan_for(Sample::type_info()).unwrap();
    let second = codec.plan_for(Sample::type_info()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(PlanCache::global().contains(TypeId::of::<Sample>()));

    assert_eq!(first.type_path(), "it::Sample");
    assert_eq!(first.property_names(), ["id", "name", "values"]);

    // Another codec sees the same plan.
    let other = Codec::new(CodecConfig::full());
    assert!(Arc::ptr_eq(&other.plan_for(Sample::type_info()).unwrap(), &first));

    assert!(codec.plan_for(<Box<dyn tg_reflect::Reflect>>::type_info()).is_none());
}

#[test]
fn known_types_travel_as_fingerprints() {
    let writer = Codec::new(CodecConfig::full());
    writer.add_known_type::<Sample>();
    let value = sample(3);

    let bytes = writer.to_bytes(&value).unwrap();
    assert_eq!(bytes[2], wire::TYPE_START_KNOWN);
    assert_eq!(bytes[3..23], fingerprint("it::Sample"));
    assert!(!bytes.windows(10).any(|w| w == b"it::Sample"));

    let reader = Codec::new(CodecConfig::full());
    reader.add_known_type::<Sample>();
    assert_eq!(reader.from_bytes::<Sample>(&bytes).unwrap(), Some(value.clone()));

    let stranger = Codec::new(CodecConfig::full());
    let err = stranger.from_bytes::<Sample>(&bytes).unwrap_err();
    assert!(matches!(
        err,
        CodecError::TypeResolution(TypeResolutionError::UnknownFingerprint(_))
    ));

    // Writers with known types turned off spell the type out.
    let portable = Codec::new(CodecConfig::portable());
    portable.add_known_type::<Sample>();
    let bytes = portable.to_bytes(&value).unwrap();
    assert_eq!(bytes[2], wire::TYPE_START);
    assert_eq!(stranger.from_bytes::<Sample>(&bytes).unwrap(), Some(value));
}

#[test]
fn added_properties_are_dropped_and_reported() {
    let writer = Codec::new(CodecConfig::portable());
    let bytes = writer
        .to_bytes(&v2::Profile {
            id: 41,
            nickname: "ace".into(),
        })
        .unwrap();

    let reader = Codec::new(CodecConfig::portable());
    reader.register::<v1::Profile>();
    let (value, report) = reader
        .deserialize_with_report(&mut &bytes[..], Some(v1::Profile::type_info()))
        .unwrap();
    let value = value.unwrap().take::<v1::Profile>().unwrap();
    assert_eq!(value, v1::Profile { id: 41 });

    assert!(!report.is_clean());
    assert_eq!(report.dropped().len(), 1);
    assert_eq!(report.dropped()[0].type_path, "it::Profile");
    assert_eq!(report.dropped()[0].property, "nickname");

    let strict = Codec::new(CodecConfig::portable().with_unknown_properties(UnknownPropertyPolicy::Reject));
    let err = strict.from_bytes::<v1::Profile>(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::SchemaMismatch(ref mismatch) if mismatch.property == "nickname"));

    // Matching streams come back clean.
    let bytes = writer.to_bytes(&v1::Profile { id: 2 }).unwrap();
    let (_, report) = reader.deserialize_with_report(&mut &bytes[..], None).unwrap();
    assert!(report.is_clean());
}

#[test]
fn dropped_properties_of_every_kind() {
    let shared: Shared<Sample> = Arc::new(RwLock::new(sample(2)));
    let ledger = v2::Ledger {
        id: 5,
        span: (-3, 3),
        entry: KeyValue::new(1, "one".into()),
        extra: v2::Extra {
            note: "n".into(),
            marks: vec![4, 5],
        },
        buddy: Some(Arc::new(RwLock::new(v2::Extra::default()))),
        counts: [(String::from("a"), 1), (String::from("b"), -2)].into(),
        sample: Some(shared.clone()),
        keep: Some(shared),
        tail: "end".into(),
    };
    let bytes = Codec::new(CodecConfig::full()).to_bytes(&ledger).unwrap();

    let reader = Codec::new(CodecConfig::portable());
    reader.register::<v1::Ledger>();
    let (value, report) = reader
        .deserialize_with_report(&mut &bytes[..], Some(v1::Ledger::type_info()))
        .unwrap();
    let value = value.unwrap().take::<v1::Ledger>().unwrap();
    assert_eq!(value.id, 5);
    assert_eq!(value.tail, "end");
    // The kept handle refers back to the dropped one, which was still built.
    assert_eq!(*value.keep.unwrap().read().unwrap(), sample(2));

    let dropped: Vec<_> = report.dropped().iter().map(|m| m.property.as_str()).collect();
    assert_eq!(dropped, ["span", "entry", "extra", "buddy", "counts", "sample"]);
    assert!(report.dropped().iter().all(|m| m.type_path == "it::Ledger"));
}

#[test]
fn nested_drift_follows_the_policy() {
    let team = v2::Team {
        lead: v2::Profile {
            id: 8,
            nickname: "cap".into(),
        },
        size: 4,
    };
    let bytes = Codec::new(CodecConfig::portable()).to_bytes(&team).unwrap();

    let lenient = Codec::new(CodecConfig::portable());
    lenient.register::<v1::Team>();
    let (value, report) = lenient
        .deserialize_with_report(&mut &bytes[..], Some(v1::Team::type_info()))
        .unwrap();
    assert_eq!(
        value.unwrap().take::<v1::Team>().unwrap(),
        v1::Team {
            lead: v1::Profile { id: 8 },
            size: 4,
        }
    );
    assert_eq!(report.dropped().len(), 1);
    assert_eq!(report.dropped()[0].type_path, "it::Profile");

    let strict = Codec::new(CodecConfig::portable().with_unknown_properties(UnknownPropertyPolicy::Reject));
    let err = strict.from_bytes::<v1::Team>(&bytes).unwrap_err();
    assert!(matches!(
        err,
        CodecError::SchemaMismatch(ref mismatch) if mismatch.type_path == "it::Profile" && mismatch.property == "nickname"
    ));
}

#[test]
fn unregistered_types_fail_to_resolve() {
    let codec = Codec::new(CodecConfig::portable());
    let bytes = codec.to_bytes(&sample(1)).unwrap();

    let err = codec.deserialize_value(&mut &bytes[..], None).unwrap_err();
    assert!(matches!(
        err,
        CodecError::TypeResolution(TypeResolutionError::UnknownTypePath(ref path)) if path == "it::Sample"
    ));

    codec.register::<Sample>();
    let value = codec.deserialize_value(&mut &bytes[..], None).unwrap().unwrap();
    assert!(value.is::<Sample>());
}

#[test]
fn wide_indices_reach_past_one_byte() {
    let handles: Vec<Shared<u32>> = (0..300).map(|i| Arc::new(RwLock::new(i))).collect();
    let mut repeated = handles.clone();
    repeated.extend(handles.iter().cloned());

    let wide = Codec::new(CodecConfig::full());
    assert_eq!(wide.config().cache_width, CacheWidth::Wide);
    let bytes = wide.to_bytes(&repeated).unwrap();
    let back: Vec<Shared<u32>> = wide.from_bytes(&bytes).unwrap().unwrap();
    assert_eq!(back.len(), 600);
    assert_eq!(*back[299].read().unwrap(), 299);
    assert!((0..300).all(|i| Arc::ptr_eq(&back[i], &back[i + 300])));

    let narrow = Codec::new(CodecConfig::portable());
    let err = narrow.to_bytes(&repeated).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Format(FormatError::CacheOverflow {
            cache: CacheKind::Object,
            index: 256,
            width: CacheWidth::Narrow,
        })
    ));

    // Strings past the narrow cache are written inline.
    let words: Vec<String> = (0..300).map(|i| format!("w{i}")).chain((0..300).map(|i| format!("w{i}"))).collect();
    let bytes = narrow.to_bytes(&words).unwrap();
    assert_eq!(narrow.from_bytes::<Vec<String>>(&bytes).unwrap(), Some(words));
}
