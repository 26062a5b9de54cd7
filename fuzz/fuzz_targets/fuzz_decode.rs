#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsontree::{DecodeOptions, ErrorKind, IntegerOverflow, decode_with};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 1; // option flags

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Every few runs, replaces the input with a freshly serialized document so
/// the fuzzer spends time past the first few tokens.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed % 10 == 0 {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x0F);

        let mut prefix = HEADER;
        prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        prefix += append_value(&mut data[prefix..], size.max(16), max_size - prefix);
        prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let n = rng.random_range(1..=limit.min(8));
        for b in &mut buf[..n] {
            *b = WS_TABLE[rng.random_range(0..WS_TABLE.len())][0];
        }
        n
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
        };
        Ok(ArbitraryValue(value))
    }
}

fn decode(data: &[u8]) {
    let Some((&flags, doc)) = data.split_first() else {
        return;
    };

    let options = DecodeOptions {
        integer_overflow: if flags & 1 != 0 {
            IntegerOverflow::Double
        } else {
            IntegerOverflow::Error
        },
        validate_strings: flags & 2 != 0,
        max_depth: if flags & 4 != 0 { 8 } else { 1024 },
        max_error_len: if flags & 8 != 0 { 3 } else { 255 },
    };

    let result = decode_with(doc, &options);

    match &result {
        Ok(value) if options.validate_strings => {
            // Validated strings are UTF-8, so the rendering must decode back
            // to the same tree.
            let again = decode_with(value.to_string().as_bytes(), &options);
            assert_eq!(again.as_ref(), Ok(value));
        }
        Ok(_) => {}
        Err(err) => {
            assert!(err.message().len() <= options.max_error_len);
            assert!(err.offset().is_some_and(|o| o <= doc.len()));
        }
    }

    // Anything serde_json accepts must decode when neither the nesting budget
    // nor integer overflow can get in the way.
    if options.max_depth == 1024
        && options.integer_overflow == IntegerOverflow::Double
        && options.validate_strings
        && serde_json::from_slice::<Value>(doc).is_ok()
    {
        assert!(
            result.is_ok() || result.as_ref().is_err_and(|e| e.kind() == ErrorKind::ResourceExhausted),
            "rejected valid JSON: {result:?}"
        );
    }
}

fuzz_target!(|data: &[u8]| decode(data));
