#![allow(missing_docs)]

use insta::assert_snapshot;
use jsontree::{Value, decode};

mod common;

fn render(value: &Value) -> String {
    format!("{value:?}")
}

#[test]
fn snapshot_scalars_and_containers() {
    let value = decode(br#"[null, true, -7, 0.5, "s\u0000", [], {}, {"k": [1e2]}]"#).unwrap();
    assert_snapshot!(render(&value), @r#"Array([Null, Bool(true), Integer(-7), Double(0.5), String("s\0"), Array([]), Object([]), Object([("k", Array([Double(100.0)]))])])"#);
}

#[test]
fn snapshot_duplicate_members() {
    let value = decode(br#"{"k":1,"k":{"k":2}}"#).unwrap();
    assert_snapshot!(render(&value), @r#"Object([("k", Integer(1)), ("k", Object([("k", Integer(2))]))])"#);
    assert_snapshot!(value, @r#"{"k":1,"k":{"k":2}}"#);
}

#[test]
fn snapshot_sample_document() {
    let value = decode(common::ORIGINAL.as_bytes()).unwrap();

    // wrap at column 80 to keep the snapshot readable
    let rendered = value.to_string();
    let mut wrapped = String::new();
    for (i, ch) in rendered.chars().enumerate() {
        if i % 80 == 0 && i > 0 {
            wrapped.push('\n');
        }
        wrapped.push(ch);
    }

    assert_snapshot!(wrapped, @r#"
    {"request":{"id":42,"method":"tools/call","params":{"name":"search","arguments":
    {"query":"café","limit":10,"ratio":0.25}}},"tags":["a","b","a"],"retry":null,"ok
    ":true,"tag":"first","tag":"second","matrix":[[1,2],[],[[-300.0]]]}
    "#);
}
