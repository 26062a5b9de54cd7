/// What to do with an integer literal that does not fit in an `i64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegerOverflow {
    /// Fail the decode with a lexical "integer overflow" error.
    #[default]
    Error,
    /// Decode the literal as a [`Value::Double`](crate::Value::Double)
    /// instead, accepting the loss of precision.
    Double,
}

/// Per-call configuration for [`decode_with`](crate::decode_with).
///
/// Options are passed by value into each decode session; nothing is shared
/// between concurrent calls.
///
/// # Examples
///
/// ```rust
/// use jsontree::{DecodeOptions, IntegerOverflow, Value, decode_with};
///
/// let options = DecodeOptions {
///     integer_overflow: IntegerOverflow::Double,
///     ..Default::default()
/// };
/// let v = decode_with(b"18446744073709551616", &options).unwrap();
/// assert_eq!(v, Value::Double(18446744073709551616.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of arrays and objects that may be open at once.
    ///
    /// Exceeding it fails with
    /// [`ErrorKind::ResourceExhausted`](crate::ErrorKind::ResourceExhausted).
    /// Decoding itself never recurses, but cloning, `Debug` formatting and
    /// serde serialization of the result use one stack frame per level.
    ///
    /// # Default
    ///
    /// `1024`
    pub max_depth: usize,

    /// Maximum length in bytes of [`DecodeError::message`].
    ///
    /// Longer messages are cut at the last character boundary that fits.
    ///
    /// # Default
    ///
    /// `255`
    ///
    /// [`DecodeError::message`]: crate::DecodeError::message
    pub max_error_len: usize,

    /// Handling of integer literals outside the `i64` range.
    ///
    /// # Default
    ///
    /// [`IntegerOverflow::Error`]
    pub integer_overflow: IntegerOverflow,

    /// Whether decoded strings and object keys must be valid UTF-8.
    ///
    /// When `false`, string bytes are kept as they appear in the input after
    /// escape decoding, whatever their encoding.
    ///
    /// # Default
    ///
    /// `false`
    pub validate_strings: bool,
}

impl DecodeOptions {
    /// Default nesting budget.
    pub const DEFAULT_MAX_DEPTH: usize = 1024;
    /// Default error message bound.
    pub const DEFAULT_MAX_ERROR_LEN: usize = 255;
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_error_len: Self::DEFAULT_MAX_ERROR_LEN,
            integer_overflow: IntegerOverflow::default(),
            validate_strings: false,
        }
    }
}
