use neko_core::{Decode, Encode};
use neko_derive::Reflect;
use neko_json::{JsonDomReader, JsonOptions, JsonStreamReader, JsonWriter};

#[derive(Reflect, Debug, PartialEq)]
struct Demo {
    a: i32,
    b: String,
    #[neko(skippable)]
    c: Option<Vec<i32>>,
    #[neko(skippable)]
    d: Option<String>,
}

fn encode(v: &Demo, options: &JsonOptions) -> String {
    let mut w = JsonWriter::new();
    v.encode(&mut w).unwrap();
    w.finish(options).unwrap()
}

#[test]
fn s1_compact_round_trip_omits_absent_optional() {
    let value = Demo {
        a: 1,
        b: "hi".to_string(),
        c: Some(vec![1, 2, 3]),
        d: None,
    };
    let text = encode(&value, &JsonOptions::compact());
    assert_eq!(text, r#"{"a":1,"b":"hi","c":[1,2,3]}"#);

    let mut reader = JsonDomReader::new(&text).unwrap();
    let decoded = Demo::decode(&mut reader).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn stream_reader_agrees_with_dom_reader() {
    let value = Demo {
        a: 42,
        b: "streamed".to_string(),
        c: None,
        d: Some("present".to_string()),
    };
    let text = encode(&value, &JsonOptions::compact());

    let mut stream = JsonStreamReader::new(&text).unwrap();
    let decoded = Demo::decode(&mut stream).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn missing_non_skippable_field_is_an_error() {
    #[derive(Reflect, Debug, PartialEq)]
    struct Required {
        a: i32,
        b: i32,
    }

    let mut reader = JsonDomReader::new(r#"{"a":1}"#).unwrap();
    assert!(Required::decode(&mut reader).is_err());
}

#[test]
fn none_as_null_compat_mode() {
    let options = JsonOptions {
        none_as_null: true,
        ..JsonOptions::default()
    };
    let mut reader = JsonDomReader::with_options(r#"{"a":1,"b":"x","d":"None"}"#, options).unwrap();
    let decoded = Demo::decode(&mut reader).unwrap();
    assert_eq!(decoded.d, None);
}

#[test]
fn pretty_indent_matches_width() {
    let value = Demo {
        a: 1,
        b: "x".to_string(),
        c: None,
        d: None,
    };
    let text = encode(&value, &JsonOptions::pretty(2));
    assert!(text.starts_with("{\n  \"a\": 1"));
}

#[test]
fn narrowing_conversion_fails_load() {
    #[derive(Reflect, Debug, PartialEq)]
    struct Byte {
        v: u8,
    }
    let mut reader = JsonDomReader::new(r#"{"v":300}"#).unwrap();
    assert!(Byte::decode(&mut reader).is_err());
}

#[test]
fn string_keyed_map_round_trips_through_both_readers() {
    use std::collections::BTreeMap;

    let mut value = BTreeMap::new();
    value.insert("one".to_string(), 1i64);
    value.insert("two".to_string(), 2i64);

    let mut w = JsonWriter::new();
    value.encode(&mut w).unwrap();
    let text = w.finish(&JsonOptions::compact()).unwrap();

    let mut dom = JsonDomReader::new(&text).unwrap();
    assert_eq!(BTreeMap::<String, i64>::decode(&mut dom).unwrap(), value);

    let mut stream = JsonStreamReader::new(&text).unwrap();
    assert_eq!(BTreeMap::<String, i64>::decode(&mut stream).unwrap(), value);
}
