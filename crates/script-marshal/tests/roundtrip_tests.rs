/// Native → script → native roundtrip tests.
///
/// Every value here is encoded with the strict encoder and decoded back into the same
/// native type; the result must equal the original.
use script_marshal::{
    decode, encode, encode_open, script_struct, struct_attributes, ByteString, Dynamic, Target,
    Value,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default, Clone, PartialEq)]
struct File {
    path: String,
    count: i64,
}

script_struct!(File {
    path: name("path"),
    count: name("count"),
});

#[derive(Debug, Default, Clone, PartialEq)]
struct Token {
    r#type: String,
    value: i64,
}

script_struct!(Token { r#type, value });

#[derive(Debug, Default, Clone, PartialEq)]
struct Manifest {
    name: String,
    files: Vec<File>,
    labels: BTreeMap<String, String>,
    parent: Option<Box<Manifest>>,
    checksum: ByteString,
    weights: Vec<f64>,
    tags: BTreeSet<String>,
}

script_struct!(Manifest {
    name,
    files,
    labels,
    parent,
    checksum,
    weights,
    tags,
});

fn roundtrip<T>(value: &T, target: Target) -> T
where
    T: script_marshal::ToScript + script_marshal::FromScript,
{
    let encoded = encode(value, target).unwrap();
    decode(&encoded).unwrap()
}

fn manifest() -> Manifest {
    Manifest {
        name: "release".into(),
        files: vec![
            File {
                path: "/bin/tool".into(),
                count: 1,
            },
            File {
                path: "/etc/tool.conf".into(),
                count: -2,
            },
        ],
        labels: [("arch", "x86_64"), ("os", "linux")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        parent: Some(Box::new(Manifest {
            name: "base".into(),
            ..Manifest::default()
        })),
        checksum: ByteString(vec![0xde, 0xad, 0xbe, 0xef]),
        weights: vec![0.5, 1.0, -3.25],
        tags: ["stable", "signed"].iter().map(|s| s.to_string()).collect(),
    }
}

// ============================================================================
// Structs
// ============================================================================

#[test]
fn flat_struct_roundtrips() {
    let file = File {
        path: "/a".into(),
        count: 5,
    };
    let value = encode(&file, Target::Record).unwrap();
    assert_eq!(value.to_string(), r#"File(path = "/a", count = 5)"#);
    assert_eq!(decode::<File>(&value).unwrap(), file);
}

#[test]
fn nested_struct_roundtrips() {
    let original = manifest();
    assert_eq!(roundtrip(&original, Target::Record), original);
}

#[test]
fn default_struct_roundtrips() {
    let original = Manifest::default();
    assert_eq!(roundtrip(&original, Target::Any), original);
}

#[test]
fn raw_identifier_fields_roundtrip() {
    let token = Token {
        r#type: "ident".into(),
        value: 3,
    };
    let value = encode(&token, Target::Record).unwrap();
    assert_eq!(value.to_string(), r#"Token(type = "ident", value = 3)"#);
    assert_eq!(decode::<Token>(&value).unwrap(), token);
}

#[test]
fn struct_attributes_feed_a_record_back() {
    let original = manifest();
    let attrs = struct_attributes(&original).unwrap();
    assert_eq!(
        attrs.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["name", "files", "labels", "parent", "checksum", "weights", "tags"]
    );
    assert_eq!(attrs["checksum"], Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef]));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn containers_roundtrip() {
    let list = vec![Some(1u16), None, Some(u16::MAX)];
    assert_eq!(roundtrip(&list, Target::List), list);

    let tuple = vec!["a".to_string(), "b".to_string()];
    assert_eq!(roundtrip(&tuple, Target::Tuple), tuple);

    let mut map = HashMap::new();
    map.insert(1i64, vec![true, false]);
    map.insert(-7i64, vec![]);
    assert_eq!(roundtrip(&map, Target::Dict), map);

    let set: BTreeSet<i8> = [3, -1, 0].into_iter().collect();
    assert_eq!(roundtrip(&set, Target::Set), set);
}

#[test]
fn extreme_integers_roundtrip() {
    assert_eq!(roundtrip(&i64::MIN, Target::Int), i64::MIN);
    assert_eq!(roundtrip(&u64::MAX, Target::Int), u64::MAX);
    assert_eq!(roundtrip(&i128::MIN, Target::Int), i128::MIN);
    assert_eq!(roundtrip(&u128::MAX, Target::Int), u128::MAX);
}

#[test]
fn text_and_bytes_roundtrip() {
    assert_eq!(roundtrip(&"caf\u{e9}".to_string(), Target::Text), "caf\u{e9}");
    assert_eq!(roundtrip(&'\u{4f60}', Target::Text), '\u{4f60}');
    let bytes = ByteString(vec![0, 255, 10]);
    assert_eq!(roundtrip(&bytes, Target::Bytes), bytes);
}

// ============================================================================
// Through the open path
// ============================================================================

#[test]
fn open_encode_then_dynamic_decode() {
    let mut map = HashMap::new();
    map.insert("ratio".to_string(), 2.0);
    map.insert("scale".to_string(), 0.5);
    let value = encode_open(&map).unwrap();
    let back: Dynamic = decode(&value).unwrap();
    assert_eq!(back.get("ratio"), Some(&Dynamic::Int(2)));
    assert_eq!(back.get("scale"), Some(&Dynamic::Float(0.5)));
}

#[test]
fn script_values_roundtrip_as_themselves() {
    let value = Value::tuple([Value::from(1), Value::from("x")]);
    assert_eq!(roundtrip(&value, Target::Any), value);
}
