//! Decode a complete JSON document into an in-memory [`Value`] tree.
//!
//! ```
//! use jsontree::{Value, decode};
//!
//! let value = decode(br#"{"a":1,"b":[true,null,2.5]}"#).unwrap();
//! assert_eq!(value.get("a"), Some(&Value::Integer(1)));
//! assert_eq!(value.to_string(), r#"{"a":1,"b":[true,null,2.5]}"#);
//! ```
//!
//! Objects keep their members in document order, duplicate keys included.
//! Strings are byte strings and may contain NUL.
//!
//! Decoding, dropping, comparing and rendering a [`Value`] walk explicit heap
//! stacks, so they handle any depth [`DecodeOptions::max_depth`] admits.
//! `Clone`, `Debug` and the `serde` serializer recurse once per level; keep
//! the depth budget near its default before using them on untrusted input.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod builder;
mod decode;
mod error;
mod event;
mod options;
mod scanner;
mod value;


pub use decode::{decode, decode_with};
pub use error::{DecodeError, ErrorKind};
pub use options::{DecodeOptions, IntegerOverflow};
pub use value::{Array, Object, Value};
