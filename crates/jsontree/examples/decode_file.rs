//! Decodes a JSON file and prints a short summary of the resulting tree.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsontree --example decode_file -- path/to/document.json
//! ```
//!
//! Set `RUST_LOG=trace` to watch containers being opened and closed.

use std::process::ExitCode;

use jsontree::{DecodeOptions, IntegerOverflow, Value, decode_with};

#[derive(Default, Debug)]
struct Summary {
    nodes: usize,
    max_depth: usize,
    objects: usize,
    arrays: usize,
    strings: usize,
    duplicate_keys: usize,
}

fn summarize(root: &Value) -> Summary {
    let mut summary = Summary::default();
    let mut pending = vec![(root, 0usize)];
    while let Some((value, depth)) = pending.pop() {
        summary.nodes += 1;
        summary.max_depth = summary.max_depth.max(depth);
        match value {
            Value::Array(items) => {
                summary.arrays += 1;
                pending.extend(items.iter().map(|v| (v, depth + 1)));
            }
            Value::Object(members) => {
                summary.objects += 1;
                for (i, (key, v)) in members.iter().enumerate() {
                    if members[..i].iter().any(|(k, _)| k == key) {
                        summary.duplicate_keys += 1;
                    }
                    pending.push((v, depth + 1));
                }
            }
            Value::String(_) => summary.strings += 1,
            _ => {}
        }
    }
    summary
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: decode_file <path>");
        return ExitCode::FAILURE;
    };
    let input = match std::fs::read(&path) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = DecodeOptions {
        integer_overflow: IntegerOverflow::Double,
        ..DecodeOptions::default()
    };
    match decode_with(&input, &options) {
        Ok(value) => {
            println!("{:#?}", summarize(&value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.offset() {
                Some(offset) => eprintln!("{path}:{offset}: {err}"),
                None => eprintln!("{path}: {err}"),
            }
            ExitCode::FAILURE
        }
    }
}
