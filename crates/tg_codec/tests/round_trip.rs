use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tg_codec::{Codec, CodecConfig, CodecError, wire};
use tg_reflect::derive::Reflect;
use tg_reflect::{KeyValue, Shared};

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "it::Person")]
struct Person {
    first_name: String,
    last_name: String,
    age: i32,
    brother: Option<Shared<Person>>,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "it::Node")]
struct Node {
    label: String,
    next: Option<Shared<Node>>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(type_path = "it::Leaves")]
struct Leaves {
    flag: bool,
    letter: char,
    tiny: i8,
    short: i16,
    int: i32,
    long: i64,
    wide: i128,
    signed: isize,
    byte: u8,
    word: u16,
    dword: u32,
    qword: u64,
    huge: u128,
    size: usize,
    single: f32,
    double: f64,
    text: String,
    elapsed: Duration,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(type_path = "it::Inventory")]
struct Inventory {
    owner: String,
    #[reflect(items)]
    stock: BTreeMap<String, u32>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(type_path = "it::Maybe")]
struct Maybe {
    count: Option<i32>,
    tags: Option<Vec<String>>,
}

#[derive(Reflect, Default, Debug)]
#[reflect(type_path = "it::Ring")]
struct Ring {
    label: String,
    back: Option<Shared<[Ring; 1]>>,
}

fn person(first_name: &str, age: i32) -> Person {
    Person {
        first_name: first_name.into(),
        last_name: "Redondo".into(),
        age,
        brother: None,
    }
}

fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

fn count(bytes: &[u8], opcode: u8) -> usize {
    bytes.iter().filter(|&&byte| byte == opcode).count()
}

#[test]
fn record_with_null_brother() {
    let codec = Codec::new(CodecConfig::portable());
    let daniel = person("Daniel", 33);
    let bytes = codec.to_bytes(&daniel).unwrap();

    assert_eq!(bytes[0], wire::FORMAT_PLAIN);
    assert_eq!(bytes[1], wire::MODE_NARROW);
    assert_eq!(bytes[2], wire::TYPE_START);
    assert_eq!(bytes[bytes.len() - 2..], [wire::NULL, wire::TYPE_END]);
    // The null brother never opens a nested type.
    assert_eq!(count(&bytes, wire::TYPE_START), 1);

    let back = codec.from_bytes::<Person>(&bytes).unwrap().unwrap();
    assert_eq!(back.first_name, daniel.first_name);
    assert_eq!(back.last_name, daniel.last_name);
    assert_eq!(back.age, 33);
    assert!(back.brother.is_none());
}

#[test]
fn list_with_a_shared_element() {
    let codec = Codec::new(CodecConfig::full());
    let ann = shared(person("Ann", 30));
    let bob = shared(Person {
        brother: Some(ann.clone()),
        ..person("Bob", 28)
    });
    let bytes = codec.to_bytes(&vec![ann, bob]).unwrap();

    // Three handle occurrences, two instances, one back-reference.
    assert_eq!(count(&bytes, wire::SHARED), 2);
    assert_eq!(count(&bytes, wire::OBJECT_REF_0), 1);
    assert_eq!(
        bytes[bytes.len() - 4..],
        [wire::OBJECT_REF_0, wire::TYPE_END, wire::LIST_END, wire::TYPE_END]
    );
    assert_eq!(bytes.windows(3).filter(|w| w == b"Ann").count(), 1);

    let family: Vec<Shared<Person>> = codec.from_bytes(&bytes).unwrap().unwrap();
    assert_eq!(family.len(), 2);
    assert_eq!(family[0].read().unwrap().first_name, "Ann");
    let brother = family[1].read().unwrap().brother.clone().unwrap();
    assert!(Arc::ptr_eq(&brother, &family[0]));
}

#[test]
fn long_lists_keep_their_length() {
    let codec = Codec::new(CodecConfig::portable());
    let values: Vec<i64> = (0..10_001).map(|i| i * 7 - 3_000).collect();

    let bytes = codec.to_bytes(&values).unwrap();
    let back: Vec<i64> = codec.from_bytes(&bytes).unwrap().unwrap();
    assert_eq!(back.len(), 10_001);
    assert_eq!(back, values);
}

#[test]
fn cycles_round_trip() {
    let codec = Codec::new(CodecConfig::full());
    let a = shared(Node {
        label: "a".into(),
        next: None,
    });
    let b = shared(Node {
        label: "b".into(),
        next: Some(a.clone()),
    });
    a.write().unwrap().next = Some(b.clone());

    let bytes = codec.to_bytes(&a).unwrap();
    a.write().unwrap().next = None;

    let back: Shared<Node> = codec.from_bytes(&bytes).unwrap().unwrap();
    let next = back.read().unwrap().next.clone().unwrap();
    assert_eq!(next.read().unwrap().label, "b");
    let around = next.read().unwrap().next.clone().unwrap();
    assert!(Arc::ptr_eq(&around, &back));

    // Break the cycle so the test does not leak.
    back.write().unwrap().next = None;
}

#[test]
fn every_leaf_kind() {
    let codec = Codec::new(CodecConfig::portable());
    let leaves = Leaves {
        flag: true,
        letter: 'λ',
        tiny: i8::MIN,
        short: -300,
        int: 15,
        long: i64::MIN,
        wide: i128::MAX,
        signed: -1,
        byte: u8::MAX,
        word: 40_000,
        dword: u32::MAX,
        qword: 16,
        huge: u128::MAX,
        size: 12,
        single: 1.5,
        double: -0.25,
        text: "grüße".into(),
        elapsed: Duration::new(90, 500),
    };

    let bytes = codec.to_bytes(&leaves).unwrap();
    assert_eq!(codec.from_bytes::<Leaves>(&bytes).unwrap(), Some(leaves));

    let zero = codec.to_bytes(&Leaves::default()).unwrap();
    assert_eq!(codec.from_bytes::<Leaves>(&zero).unwrap(), Some(Leaves::default()));
}

#[test]
fn bare_leaves_and_nulls() {
    let codec = Codec::new(CodecConfig::portable());

    let bytes = codec.to_bytes(&String::from("alone")).unwrap();
    assert_eq!(codec.from_bytes::<String>(&bytes).unwrap().as_deref(), Some("alone"));

    let bytes = codec.to_bytes(&7_u32).unwrap();
    assert_eq!(bytes, [wire::FORMAT_PLAIN, wire::MODE_NARROW, wire::SMALL_U32 + 7]);
    assert_eq!(codec.from_bytes::<u32>(&bytes).unwrap(), Some(7));

    let mut null = Vec::new();
    codec.serialize_null(&mut null).unwrap();
    assert_eq!(null, [wire::FORMAT_PLAIN, wire::MODE_NARROW, wire::NULL]);
    assert_eq!(codec.from_bytes::<Person>(&null).unwrap(), None);

    let bytes = codec.to_bytes(&None::<i32>).unwrap();
    assert_eq!(codec.from_bytes::<Option<i32>>(&bytes).unwrap(), None);
}

#[test]
fn empty_containers_stay_non_null() {
    let codec = Codec::new(CodecConfig::portable());

    let bytes = codec.to_bytes(&Vec::<String>::new()).unwrap();
    assert_eq!(
        bytes[bytes.len() - 4..],
        [wire::LIST_START, 0, wire::LIST_END, wire::TYPE_END]
    );
    assert_eq!(codec.from_bytes::<Vec<String>>(&bytes).unwrap(), Some(Vec::new()));

    let bytes = codec.to_bytes(&BTreeMap::<String, i32>::new()).unwrap();
    assert_eq!(bytes[bytes.len() - 4..], [wire::MAP_START, 0, wire::MAP_END, wire::TYPE_END]);
    assert_eq!(codec.from_bytes::<BTreeMap<String, i32>>(&bytes).unwrap(), Some(BTreeMap::new()));
}

#[test]
fn maps_arrays_and_items_fields() {
    let codec = Codec::new(CodecConfig::portable());

    let mut scores = BTreeMap::new();
    scores.insert(String::from("ann"), vec![3, 1]);
    scores.insert(String::from("bob"), Vec::new());
    let bytes = codec.to_bytes(&scores).unwrap();
    assert_eq!(codec.from_bytes::<BTreeMap<String, Vec<i32>>>(&bytes).unwrap(), Some(scores));

    let grid = [[1_u8, 2], [3, 4], [5, 6]];
    let bytes = codec.to_bytes(&grid).unwrap();
    assert_eq!(codec.from_bytes::<[[u8; 2]; 3]>(&bytes).unwrap(), Some(grid));

    let mut inventory = Inventory {
        owner: "shop".into(),
        stock: BTreeMap::new(),
    };
    inventory.stock.insert("apple".into(), 12);
    inventory.stock.insert("pear".into(), 0);
    let bytes = codec.to_bytes(&inventory).unwrap();
    assert_eq!(codec.from_bytes::<Inventory>(&bytes).unwrap(), Some(inventory));
}

#[test]
fn optional_properties() {
    let codec = Codec::new(CodecConfig::portable());
    for value in [
        Maybe::default(),
        Maybe {
            count: Some(0),
            tags: Some(Vec::new()),
        },
        Maybe {
            count: Some(-9),
            tags: Some(vec!["x".into(), "x".into()]),
        },
    ] {
        let bytes = codec.to_bytes(&value).unwrap();
        assert_eq!(codec.from_bytes::<Maybe>(&bytes).unwrap(), Some(value));
    }
}

#[test]
fn tuples_and_pairs_under_the_full_profile() {
    let codec = Codec::new(CodecConfig::full());

    let value = (4_u8, String::from("four"), Some(4.0_f64));
    let bytes = codec.to_bytes(&value).unwrap();
    assert_eq!(bytes[2], wire::TUPLE_START);
    assert_eq!(codec.from_bytes::<(u8, String, Option<f64>)>(&bytes).unwrap(), Some(value));

    let pairs = vec![KeyValue::new(1_u16, 'a'), KeyValue::new(2, 'b')];
    let bytes = codec.to_bytes(&pairs).unwrap();
    assert_eq!(count(&bytes, wire::PAIR_START), 2);
    assert_eq!(codec.from_bytes::<Vec<KeyValue<u16, char>>>(&bytes).unwrap(), Some(pairs));
}

#[test]
fn portable_profile_has_no_tuples() {
    let codec = Codec::new(CodecConfig::portable());
    let err = codec.to_bytes(&(1_i32, 2_i32)).unwrap_err();
    assert!(matches!(err, CodecError::Unsupported { .. }));

    // The codec stays usable.
    assert!(codec.to_bytes(&1_i32).is_ok());
}

#[test]
fn lists_of_composites() {
    let codec = Codec::new(CodecConfig::portable());
    let people = vec![person("Ann", 30), person("Bob", 28), person("Cid", 4)];

    let bytes = codec.to_bytes(&people).unwrap();
    let back: Vec<Person> = codec.from_bytes(&bytes).unwrap().unwrap();
    let names: Vec<_> = back.iter().map(|p| (p.first_name.as_str(), p.age)).collect();
    assert_eq!(names, [("Ann", 30), ("Bob", 28), ("Cid", 4)]);

    let queue: VecDeque<Maybe> = [Maybe::default(), Maybe { count: Some(3), tags: None }].into();
    let bytes = codec.to_bytes(&queue).unwrap();
    assert_eq!(codec.from_bytes::<VecDeque<Maybe>>(&bytes).unwrap(), Some(queue));
}

#[test]
fn maps_of_composites() {
    let codec = Codec::new(CodecConfig::full());

    let ann = shared(person("Ann", 30));
    let mut by_name = BTreeMap::new();
    for (i, name) in ["dan", "eve", "fay", "gus"].into_iter().enumerate() {
        let mut entry = person(name, i as i32);
        entry.brother = Some(ann.clone());
        by_name.insert(String::from(name), entry);
    }
    let bytes = codec.to_bytes(&by_name).unwrap();
    assert_eq!(bytes.windows(3).filter(|w| w == b"Ann").count(), 1);

    let back: BTreeMap<String, Person> = codec.from_bytes(&bytes).unwrap().unwrap();
    assert_eq!(back.len(), 4);
    assert_eq!(back["fay"].age, 2);
    let first = back["dan"].brother.clone().unwrap();
    assert_eq!(first.read().unwrap().first_name, "Ann");
    assert!(back.values().all(|p| Arc::ptr_eq(p.brother.as_ref().unwrap(), &first)));

    let mut hashed = HashMap::new();
    hashed.insert(7_u32, Maybe { count: Some(7), tags: None });
    hashed.insert(9_u32, Maybe::default());
    let bytes = codec.to_bytes(&hashed).unwrap();
    assert_eq!(codec.from_bytes::<HashMap<u32, Maybe>>(&bytes).unwrap(), Some(hashed));

    // Tuple keys are looked up by position.
    let mut grid = BTreeMap::new();
    grid.insert((0_u8, 1_u8), String::from("b"));
    grid.insert((0, 0), String::from("a"));
    let bytes = codec.to_bytes(&grid).unwrap();
    assert_eq!(codec.from_bytes::<BTreeMap<(u8, u8), String>>(&bytes).unwrap(), Some(grid));
}

#[test]
fn shared_arrays_cannot_hold_themselves() {
    let codec = Codec::new(CodecConfig::full());
    let ring = shared([Ring {
        label: "r".into(),
        back: None,
    }]);
    ring.write().unwrap()[0].back = Some(ring.clone());

    let err = codec.to_bytes(&ring).unwrap_err();
    assert!(matches!(err, CodecError::Unsupported { .. }));
    ring.write().unwrap()[0].back = None;

    // Repeats of a finished array are fine.
    let bytes = codec.to_bytes(&vec![ring.clone(), ring]).unwrap();
    assert_eq!(count(&bytes, wire::SHARED), 1);
    let back: Vec<Shared<[Ring; 1]>> = codec.from_bytes(&bytes).unwrap().unwrap();
    assert!(Arc::ptr_eq(&back[0], &back[1]));
    assert_eq!(back[0].read().unwrap()[0].label, "r");
}
