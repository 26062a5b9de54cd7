use alloc::string::{String, ToString};
use core::fmt;

use thiserror::Error;

/// The broad class of a [`DecodeError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed or unrepresentable token.
    Lexical,
    /// Tokens in an order the JSON grammar does not allow, including
    /// premature end of input and trailing content.
    Structural,
    /// An allocation failed or the nesting budget was exceeded.
    ResourceExhausted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Structural => "parse error",
            ErrorKind::ResourceExhausted => "resource exhausted",
        })
    }
}

/// The error returned by [`decode`](crate::decode) when no value could be
/// produced.
///
/// No partially built value accompanies the error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct DecodeError {
    kind: ErrorKind,
    message: String,
    offset: Option<usize>,
}

impl DecodeError {
    /// Builds an error, truncating the rendered message to at most
    /// `max_len` bytes on a character boundary.
    pub(crate) fn new(
        kind: ErrorKind,
        message: &impl fmt::Display,
        offset: Option<usize>,
        max_len: usize,
    ) -> Self {
        let mut message = message.to_string();
        if message.len() > max_len {
            let mut end = max_len;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }
        Self {
            kind,
            message,
            offset,
        }
    }

    /// The class of failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human readable description, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset into the input at which the error was detected, when
    /// known.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_prefixes_kind() {
        let err = DecodeError::new(ErrorKind::Structural, &"premature EOF", Some(3), 255);
        assert_eq!(err.to_string(), "parse error: premature EOF");
        assert_eq!(err.offset(), Some(3));
    }

    #[test]
    fn message_is_truncated_on_char_boundary() {
        // "é" is two bytes; a cut at 3 would split the second one
        let err = DecodeError::new(ErrorKind::Lexical, &"éé", None, 3);
        assert_eq!(err.message(), "é");

        let err = DecodeError::new(ErrorKind::Lexical, &"abcdef", None, 4);
        assert_eq!(err.message(), "abcd");
    }
}
