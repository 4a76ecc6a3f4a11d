/// Open (JSON-style) conversion tests.
///
/// The open encoder collapses integral floats to ints and sorts map keys; the strict
/// encoder does neither. The open decoder falls back to printed forms instead of
/// failing on variants JSON cannot hold.
use script_marshal::{
    decode, decode_open, decode_open_list, decode_open_map, encode, encode_open,
    encode_open_dict, encode_open_list, script_struct, BigInt, ConvertError, Dict, Record, Set,
    Target, Value,
};
use serde_json::json;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct Point {
    x: i32,
}

script_struct!(Point { x });

fn text(s: &str) -> Value {
    Value::from(s)
}

fn keys(dict: &Dict) -> Vec<String> {
    dict.keys().map(Value::to_str).collect()
}

// ============================================================================
// Integral-float collapsing
// ============================================================================

#[test]
fn integral_float_collapses_only_on_open_path() {
    assert_eq!(encode_open(&3.0f64).unwrap(), Value::from(3));
    assert_eq!(encode(&3.0f64, Target::Float).unwrap(), Value::Float(3.0));
}

#[test]
fn fractional_and_non_finite_floats_stay_floats() {
    assert_eq!(encode_open(&3.5f64).unwrap(), Value::Float(3.5));
    assert_eq!(encode_open(&f64::INFINITY).unwrap(), Value::Float(f64::INFINITY));
    assert_eq!(encode_open(&f64::NAN).unwrap(), Value::Float(f64::NAN));
}

#[test]
fn large_integral_float_becomes_exact_int() {
    let v = encode_open(&1e20f64).unwrap();
    assert_eq!(v, Value::Int("100000000000000000000".parse::<BigInt>().unwrap()));
}

#[test]
fn f32_collapses_too() {
    assert_eq!(encode_open(&2.0f32).unwrap(), Value::from(2));
}

#[test]
fn script_values_pass_through_unchanged() {
    assert_eq!(encode_open(&Value::Float(3.0)).unwrap(), Value::Float(3.0));
    let list = Value::tuple([1, 2]);
    assert_eq!(encode_open(&list).unwrap(), list);
}

// ============================================================================
// Scalars, absent values and unsupported shapes
// ============================================================================

#[test]
fn absent_values_become_null() {
    assert_eq!(encode_open(&None::<String>).unwrap(), Value::Null);
    assert_eq!(encode_open(&()).unwrap(), Value::Null);
    assert_eq!(encode_open(&json!(null)).unwrap(), Value::Null);
}

#[test]
fn structs_are_not_open_values() {
    let err = encode_open(&Point::default()).unwrap_err();
    assert!(matches!(&err, ConvertError::Unsupported(name) if name == "struct Point"));
}

#[test]
fn channels_are_not_open_values() {
    let (_tx, rx) = std::sync::mpsc::channel::<()>();
    assert!(matches!(encode_open(&rx).unwrap_err(), ConvertError::Unsupported(_)));
}

// ============================================================================
// Dict determinism
// ============================================================================

#[test]
fn string_keyed_map_is_sorted() {
    let map: HashMap<String, i32> = ["delta", "alpha", "charlie", "bravo"]
        .iter()
        .enumerate()
        .map(|(i, k)| (k.to_string(), i as i32))
        .collect();
    let first = encode_open(&map).unwrap();
    let second = encode_open(&map).unwrap();
    let first = first.as_dict().unwrap();
    assert_eq!(keys(first), vec!["alpha", "bravo", "charlie", "delta"]);
    assert_eq!(keys(first), keys(second.as_dict().unwrap()));
}

#[test]
fn non_string_keys_sort_by_printed_form() {
    let map: HashMap<i32, bool> = [(9, true), (10, false), (100, true)].into_iter().collect();
    let dict = encode_open_dict(&map).unwrap();
    assert_eq!(keys(&dict), vec!["10", "100", "9"]);
    assert_eq!(dict.get(&Value::from(9)), Some(&Value::Bool(true)));
}

#[test]
fn keys_that_print_alike_still_have_one_order() {
    let orders: HashSet<String> = (0..32)
        .map(|_| {
            let map: HashMap<Value, i32> = [
                (Value::from(1), 1),
                (text("1"), 2),
                (Value::Bool(true), 3),
                (text("True"), 4),
            ]
            .into_iter()
            .collect();
            encode_open(&map).unwrap().to_string()
        })
        .collect();
    assert_eq!(orders.len(), 1);
    assert!(orders.contains(r#"{"1": 2, 1: 1, "True": 4, True: 3}"#));
}

#[test]
fn json_object_is_sorted_and_collapsed() {
    let doc = json!({"b": 1.0, "a": [1, 2.5, null]});
    let v = encode_open(&doc).unwrap();
    assert_eq!(v.to_string(), r#"{"a": [1, 2.5, None], "b": 1}"#);
}

#[test]
fn nested_maps_are_sorted_at_every_level() {
    let mut inner = HashMap::new();
    inner.insert("z", 1);
    inner.insert("y", 2);
    let mut outer = HashMap::new();
    outer.insert("b", inner.clone());
    outer.insert("a", inner);
    let v = encode_open(&outer).unwrap();
    assert_eq!(v.to_string(), r#"{"a": {"y": 2, "z": 1}, "b": {"y": 2, "z": 1}}"#);
}

#[test]
fn open_dict_rejects_sequences() {
    let err = encode_open_dict(&vec![1]).unwrap_err();
    assert_eq!(err.to_string(), "cannot convert native sequence to script dict");
}

#[test]
fn open_list_collapses_elements() {
    assert_eq!(
        encode_open_list(&vec![1.0, 1.5]).unwrap(),
        vec![Value::from(1), Value::Float(1.5)]
    );
    let err = encode_open_list(&HashMap::<String, i32>::new()).unwrap_err();
    assert_eq!(err.to_string(), "cannot convert native map to script list");
}

// ============================================================================
// Open decode
// ============================================================================

#[test]
fn decode_open_scalars() {
    assert_eq!(decode_open(&Value::Null).unwrap(), json!(null));
    assert_eq!(decode_open(&Value::Bool(false)).unwrap(), json!(false));
    assert_eq!(decode_open(&Value::from(-3)).unwrap(), json!(-3));
    assert_eq!(decode_open(&Value::Float(0.25)).unwrap(), json!(0.25));
    assert_eq!(decode_open(&text("s")).unwrap(), json!("s"));
}

#[test]
fn decode_open_keeps_int_and_float_apart() {
    assert!(decode_open(&Value::Float(3.0)).unwrap().is_f64());
    assert!(decode_open(&Value::from(3)).unwrap().is_i64());
}

#[test]
fn big_int_falls_back_to_decimal_string() {
    let n = BigInt::from(u64::MAX);
    assert_eq!(decode_open(&Value::Int(n)).unwrap(), json!("18446744073709551615"));
}

#[test]
fn unfamiliar_variants_fall_back_to_printed_form() {
    let mut set = Set::new();
    set.insert(Value::from(1)).unwrap();
    assert_eq!(decode_open(&Value::Set(set)).unwrap(), json!("set([1])"));
    assert_eq!(decode_open(&Value::Bytes(b"ab".to_vec())).unwrap(), json!("b\"ab\""));
    let record = Record::with_attrs("P", [("x", Value::from(1))]).unwrap();
    assert_eq!(decode_open(&Value::Record(record)).unwrap(), json!("P(x = 1)"));
    assert_eq!(decode_open(&Value::Float(f64::NAN)).unwrap(), json!("nan"));
}

#[test]
fn decode_open_containers() {
    let inner = Dict::from_entries([(text("k"), Value::tuple([1, 2]))]).unwrap();
    let outer = Dict::from_entries([(text("inner"), Value::Dict(inner))]).unwrap();
    assert_eq!(
        decode_open(&Value::Dict(outer)).unwrap(),
        json!({"inner": {"k": [1, 2]}})
    );
}

#[test]
fn decode_open_requires_text_keys() {
    let d = Dict::from_entries([(Value::from(1), Value::Null)]).unwrap();
    let err = decode_open(&Value::Dict(d)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot convert script int dict key to native string key"
    );
}

#[test]
fn decode_open_map_and_list_check_the_variant() {
    let d = Dict::from_entries([(text("a"), Value::from(1))]).unwrap();
    let map = decode_open_map(&Value::Dict(d)).unwrap();
    assert_eq!(map["a"], json!(1));
    assert!(decode_open_map(&Value::list([1])).is_err());

    assert_eq!(decode_open_list(&Value::list([1, 2])).unwrap(), vec![json!(1), json!(2)]);
    assert!(decode_open_list(&Value::tuple([1])).is_err());
}

#[test]
fn element_errors_carry_their_path() {
    let bad = Dict::from_entries([(Value::from(1), Value::Null)]).unwrap();
    let v = Value::list([Value::Null, Value::Dict(bad)]);
    let err = decode_open(&v).unwrap_err();
    assert!(err.to_string().starts_with("list[1]: "));
}

// ============================================================================
// serde_json::Value as a native type
// ============================================================================

#[test]
fn json_value_is_a_decode_destination() {
    let v = Value::list([Value::from(1), text("two")]);
    let got: serde_json::Value = decode(&v).unwrap();
    assert_eq!(got, json!([1, "two"]));
}

#[test]
fn json_value_on_the_strict_path_keeps_floats() {
    let v = encode(&json!({"n": 2.0}), Target::Dict).unwrap();
    assert_eq!(v.as_dict().unwrap().get_str("n"), Some(&Value::Float(2.0)));
}
