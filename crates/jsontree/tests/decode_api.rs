#![allow(missing_docs)]

use jsontree::{DecodeOptions, ErrorKind, IntegerOverflow, Value, decode, decode_with};

mod common;

#[test]
fn decodes_the_sample_document() {
    let value = decode(common::ORIGINAL.as_bytes()).unwrap();

    assert!(value.is_object());
    assert_eq!(value.to_string(), common::COMPACT);

    let request = value.get("request").unwrap();
    assert_eq!(request.get("id").and_then(Value::as_i64), Some(42));
    let arguments = request
        .get("params")
        .and_then(|p| p.get("arguments"))
        .unwrap();
    assert_eq!(arguments.get("query").and_then(Value::as_str), Some("café"));
    assert_eq!(arguments.get("ratio").and_then(Value::as_f64), Some(0.25));

    assert_eq!(
        value.get_all("tag").filter_map(Value::as_str).collect::<Vec<_>>(),
        ["first", "second"]
    );
    assert!(value.get("retry").is_some_and(Value::is_null));
    assert_eq!(value.get("ok").and_then(Value::as_bool), Some(true));
}

#[test]
fn decoding_is_repeatable() {
    let first = decode(common::ORIGINAL.as_bytes()).unwrap();
    let second = decode(first.to_string().as_bytes()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failed_decodes_leave_no_state_behind() {
    let options = DecodeOptions::default();
    for bad in [&b"[1,"[..], b"{\"a\":", b"[[[[", b"]"] {
        assert!(decode_with(bad, &options).is_err());
    }
    assert_eq!(decode_with(b"[1]", &options), Ok(Value::Array(vec![Value::Integer(1)])));
}

#[test]
fn default_options() {
    let options = DecodeOptions::default();
    assert_eq!(options.max_depth, 1024);
    assert_eq!(options.max_error_len, 255);
    assert_eq!(options.integer_overflow, IntegerOverflow::Error);
    assert!(!options.validate_strings);
}

#[test]
fn depth_budget_boundary() {
    let limit = DecodeOptions::default().max_depth;
    assert!(decode(common::nested_arrays(limit).as_bytes()).is_ok());

    let err = decode(common::nested_arrays(limit + 1).as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}

#[test]
fn raised_budget_allows_deeper_documents() {
    let options = DecodeOptions {
        max_depth: 100_000,
        ..DecodeOptions::default()
    };
    let input = common::nested_arrays(50_000);
    let value = decode_with(input.as_bytes(), &options).unwrap();
    assert!(value.is_array());
    assert_eq!(value.to_string(), input);
    assert!(value == decode_with(input.as_bytes(), &options).unwrap());
}

#[test]
fn deep_documents_are_released_on_failure() {
    let options = DecodeOptions {
        max_depth: 100_000,
        ..DecodeOptions::default()
    };
    let deep = common::nested_arrays(50_000);

    let err = decode_with(format!("{deep} 1").as_bytes(), &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.message(), "trailing garbage");

    let err = decode_with(format!("[{deep},").as_bytes(), &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.message(), "premature EOF");
}

#[test]
fn public_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
    assert_send_sync::<jsontree::DecodeError>();
    assert_send_sync::<DecodeOptions>();
}

#[test]
fn concurrent_decodes_are_independent() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let options = DecodeOptions {
                    max_depth: i + 1,
                    ..DecodeOptions::default()
                };
                decode_with(common::nested_arrays(3).as_bytes(), &options).is_ok()
            })
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, [false, false, true, true]);
}

#[test]
fn errors_implement_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(decode(b"").unwrap_err());
    assert_eq!(err.to_string(), "parse error: premature EOF");
}

#[cfg(feature = "serde")]
#[test]
fn serde_output_matches_display() {
    let value = decode(common::ORIGINAL.as_bytes()).unwrap();
    assert_eq!(serde_json::to_string(&value).unwrap(), common::COMPACT);
}
