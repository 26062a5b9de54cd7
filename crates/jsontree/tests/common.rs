#![allow(missing_docs)]
#![allow(dead_code)]

/// A tool-call shaped document with nesting, escapes and a repeated key.
pub const ORIGINAL: &str = r#"
{
    "request": {
        "id": 42,
        "method": "tools/call",
        "params": {
            "name": "search",
            "arguments": {"query": "café", "limit": 10, "ratio": 0.25}
        }
    },
    "tags": ["a", "b", "a"],
    "retry": null,
    "ok": true,
    "tag": "first",
    "tag": "second",
    "matrix": [[1, 2], [], [[-3e2]]]
}"#;

/// `ORIGINAL` rendered without whitespace.
pub const COMPACT: &str = r#"{"request":{"id":42,"method":"tools/call","params":{"name":"search","arguments":{"query":"café","limit":10,"ratio":0.25}}},"tags":["a","b","a"],"retry":null,"ok":true,"tag":"first","tag":"second","matrix":[[1,2],[],[[-300.0]]]}"#;

/// `depth` arrays nested inside each other.
pub fn nested_arrays(depth: usize) -> String {
    let mut out = String::with_capacity(2 * depth);
    out.extend(std::iter::repeat_n('[', depth));
    out.extend(std::iter::repeat_n(']', depth));
    out
}
