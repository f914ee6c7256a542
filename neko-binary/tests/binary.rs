use std::collections::BTreeMap;

use neko_binary::{from_bytes, to_bytes};
use neko_derive::Reflect;

#[derive(Reflect, Debug, PartialEq)]
struct Demo {
    a: i32,
    b: String,
    c: u32,
}

#[test]
fn s2_length_prefixed_round_trip() {
    let value = Demo {
        a: 1,
        b: "hi".to_string(),
        c: 3,
    };
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(from_bytes::<Demo>(&bytes).unwrap(), value);
}

#[test]
fn string_keyed_map_round_trips() {
    let mut value = BTreeMap::new();
    value.insert("one".to_string(), 1i64);
    value.insert("two".to_string(), 2i64);

    let bytes = to_bytes(&value).unwrap();
    assert_eq!(from_bytes::<BTreeMap<String, i64>>(&bytes).unwrap(), value);
}
