//! JSON value types and utilities.
//!
//! This module defines the [`Value`] enum produced by [`decode`], and the
//! helpers used to render a value back to JSON text.
//!
//! [`decode`]: crate::decode
use alloc::{string::String, vec, vec::Vec};
use core::{
    fmt::{self, Write as _},
    mem, slice,
};

use bstr::{BString, ByteSlice};

/// The elements of a decoded JSON array, in document order.
pub type Array = Vec<Value>;

/// The members of a decoded JSON object, in document order.
///
/// Keys are not deduplicated: `{"k":1,"k":2}` produces two entries.
pub type Object = Vec<(BString, Value)>;

/// A decoded JSON value.
///
/// Strings and object keys are kept as raw bytes ([`BString`]) exactly as the
/// scanner produced them after escape decoding; they are only checked for
/// UTF-8 validity when [`DecodeOptions::validate_strings`] is set.
///
/// # Examples
///
/// ```
/// use jsontree::{Value, decode};
///
/// let v = decode(br#"{"a":1,"a":[true,null]}"#).unwrap();
/// assert_eq!(
///     v,
///     Value::Object(vec![
///         ("a".into(), Value::Integer(1)),
///         ("a".into(), Value::Array(vec![Value::Bool(true), Value::Null])),
///     ])
/// );
/// assert_eq!(v.to_string(), r#"{"a":1,"a":[true,null]}"#);
/// ```
///
/// [`DecodeOptions::validate_strings`]: crate::DecodeOptions::validate_strings
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// A JSON `null`.
    #[default]
    Null,
    /// A JSON boolean.
    Bool(bool),
    /// A JSON number written without fraction or exponent.
    Integer(i64),
    /// A JSON number written with a fraction or exponent.
    Double(f64),
    /// A JSON string.
    String(BString),
    /// A JSON array.
    Array(Array),
    /// A JSON object, as an ordered list of members.
    Object(Object),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v.into())
    }
}

impl From<BString> for Value {
    fn from(v: BString) -> Self {
        Self::String(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is an [`Integer`] or a [`Double`].
    ///
    /// [`Integer`]: Value::Integer
    /// [`Double`]: Value::Double
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(..) | Self::Double(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Returns the boolean if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Returns the integer if this is a [`Value::Integer`].
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        if let Self::Integer(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Returns the number as an `f64` if this is a [`Value::Double`] or a
    /// [`Value::Integer`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Borrows the string bytes if this is a [`Value::String`].
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let Self::String(v) = self {
            Some(v.as_slice())
        } else {
            None
        }
    }

    /// Borrows the string as `&str` if this is a [`Value::String`] holding
    /// valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| b.to_str().ok())
    }

    /// Borrows the elements if this is a [`Value::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        if let Self::Array(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Borrows the members if this is a [`Value::Object`].
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        if let Self::Object(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Returns the value of the first member named `key`, if this is an
    /// object that has one.
    ///
    /// Later duplicates are reachable through [`Value::get_all`].
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.get_all(key).next()
    }

    /// Iterates over the values of every member named `key`, in document
    /// order. Yields nothing for non-objects.
    pub fn get_all(&self, key: impl AsRef<[u8]>) -> impl Iterator<Item = &Value> {
        let members = self.as_object().map_or(&[][..], Vec::as_slice);
        members
            .iter()
            .filter(move |(k, _)| k.as_slice() == key.as_ref())
            .map(|(_, v)| v)
    }
}

/// Escapes a byte string for inclusion in a JSON string literal.
///
/// Surrogate code points stored in their three-byte generalized UTF-8 form
/// are written back as `\uXXXX` escapes. Other invalid UTF-8 sequences are
/// written as U+FFFD. Quotes, backslashes, control characters and the
/// Unicode line separators are escaped.
pub(crate) fn write_escaped_bytes<W: fmt::Write>(src: &[u8], f: &mut W) -> fmt::Result {
    let mut rest = src;
    while !rest.is_empty() {
        if let [0xED, hi @ 0xA0..=0xBF, lo @ 0x80..=0xBF, tail @ ..] = rest {
            let code = 0xD000 | (u32::from(hi & 0x3F) << 6) | u32::from(lo & 0x3F);
            write!(f, "\\u{code:04X}")?;
            rest = tail;
            continue;
        }
        let (c, len) = bstr::decode_utf8(rest);
        rest = &rest[len..];
        match c.unwrap_or(char::REPLACEMENT_CHARACTER) {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c @ ('\u{2028}' | '\u{2029}') => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Writes a float so that decoding the text yields the same `f64` back as a
/// [`Value::Double`].
///
/// `Debug` prints the shortest round-trip form and always includes either a
/// fraction or an exponent. Non-finite values have no JSON spelling and are
/// written as `null`.
fn write_double<W: fmt::Write>(n: f64, f: &mut W) -> fmt::Result {
    if n.is_finite() {
        write!(f, "{n:?}")
    } else {
        f.write_str("null")
    }
}

/// A container whose members are still being written.
enum Open<'a> {
    Array {
        items: slice::Iter<'a, Value>,
        started: bool,
    },
    Object {
        members: slice::Iter<'a, (BString, Value)>,
        started: bool,
    },
}

fn write_scalar<W: fmt::Write>(value: &Value, f: &mut W) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => write!(f, "{n}"),
        Value::Double(n) => write_double(*n, f),
        Value::String(s) => {
            f.write_char('"')?;
            write_escaped_bytes(s, f)?;
            f.write_char('"')
        }
        Value::Array(_) | Value::Object(_) => Ok(()),
    }
}

// Rendering walks an explicit stack, like decoding does.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut open: Vec<Open<'_>> = Vec::new();
        let mut next = Some(self);
        loop {
            match next.take() {
                Some(Value::Array(items)) => {
                    f.write_char('[')?;
                    open.push(Open::Array {
                        items: items.iter(),
                        started: false,
                    });
                }
                Some(Value::Object(members)) => {
                    f.write_char('{')?;
                    open.push(Open::Object {
                        members: members.iter(),
                        started: false,
                    });
                }
                Some(scalar) => write_scalar(scalar, f)?,
                None => {}
            }

            let Some(top) = open.last_mut() else {
                return Ok(());
            };
            let closed = match top {
                Open::Array { items, started } => match items.next() {
                    Some(v) => {
                        if mem::replace(started, true) {
                            f.write_char(',')?;
                        }
                        next = Some(v);
                        None
                    }
                    None => Some(']'),
                },
                Open::Object { members, started } => match members.next() {
                    Some((k, v)) => {
                        if mem::replace(started, true) {
                            f.write_char(',')?;
                        }
                        f.write_char('"')?;
                        write_escaped_bytes(k, f)?;
                        f.write_str("\":")?;
                        next = Some(v);
                        None
                    }
                    None => Some('}'),
                },
            };
            if let Some(close) = closed {
                f.write_char(close)?;
                open.pop();
            }
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Value::Null, Value::Null) => {}
                (Value::Bool(a), Value::Bool(b)) if a == b => {}
                (Value::Integer(a), Value::Integer(b)) if a == b => {}
                (Value::Double(a), Value::Double(b)) if a == b => {}
                (Value::String(a), Value::String(b)) if a == b => {}
                (Value::Array(a), Value::Array(b)) if a.len() == b.len() => {
                    pending.extend(a.iter().zip(b));
                }
                (Value::Object(a), Value::Object(b)) if a.len() == b.len() => {
                    for ((ka, va), (kb, vb)) in a.iter().zip(b) {
                        if ka != kb {
                            return false;
                        }
                        pending.push((va, vb));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

// The generated drop glue recurses once per nesting level; move children
// onto a heap stack instead.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = match self {
            Value::Array(items) if items.iter().any(is_container) => mem::take(items),
            Value::Object(members) if members.iter().any(|(_, v)| is_container(v)) => {
                mem::take(members).into_iter().map(|(_, v)| v).collect()
            }
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Array(items) => pending.append(items),
                Value::Object(members) => pending.extend(members.drain(..).map(|(_, v)| v)),
                _ => {}
            }
        }
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

// Objects serialize as maps, duplicates included; serde_json writes every
// entry it is handed.
#[cfg(any(test, feature = "serde"))]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Double(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(&s.to_str_lossy()),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (k, v) in members {
                    map.serialize_entry(&*k.to_str_lossy(), v)?;
                }
                map.end()
            }
        }
    }
}
