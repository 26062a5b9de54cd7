use log::debug;

use crate::{
    builder::{BuildError, TreeBuilder},
    error::{DecodeError, ErrorKind},
    options::DecodeOptions,
    scanner::{ScanError, ScanErrorSource, Scanner, SyntaxError},
    value::Value,
};

/// Decodes one JSON document into a [`Value`] with default options.
///
/// The input must hold exactly one JSON value, optionally surrounded by
/// whitespace. Either the whole tree is returned or an error; there is no
/// partial result.
///
/// # Errors
///
/// Returns a [`DecodeError`] of kind
/// - [`ErrorKind::Lexical`] for malformed tokens,
/// - [`ErrorKind::Structural`] for misplaced tokens, empty or truncated input
///   and trailing content,
/// - [`ErrorKind::ResourceExhausted`] when memory or the nesting budget runs
///   out.
///
/// # Examples
///
/// ```
/// use jsontree::{ErrorKind, Value, decode};
///
/// assert_eq!(
///     decode(b"[1,2,3]").unwrap(),
///     Value::Array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
/// );
///
/// let err = decode(br#"{"a":}"#).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Structural);
/// assert_eq!(err.offset(), Some(5));
/// ```
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    decode_with(input, &DecodeOptions::default())
}

/// Decodes one JSON document into a [`Value`] using `options`.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    Session::new(options)?.run(input)
}

/// State owned by a single decode call.
struct Session {
    options: DecodeOptions,
    builder: TreeBuilder,
}

impl Session {
    fn new(options: &DecodeOptions) -> Result<Self, DecodeError> {
        let builder = TreeBuilder::new(options.max_depth)
            .map_err(|e| build_error(e, None, options.max_error_len))?;
        Ok(Self {
            options: *options,
            builder,
        })
    }

    fn run(mut self, input: &[u8]) -> Result<Value, DecodeError> {
        let max_len = self.options.max_error_len;
        let scanned = Scanner::new(input, &self.options).run(&mut self.builder);
        if let Err(err) = scanned {
            let released = self.builder.discard();
            debug!(
                "decode failed at offset {} with {released} open containers",
                err.offset
            );
            return Err(scan_error(err, max_len));
        }
        let end = input.len();
        self.builder
            .finish()
            .map_err(|e| build_error(e, Some(end), max_len))
    }
}

fn build_error(err: BuildError, offset: Option<usize>, max_len: usize) -> DecodeError {
    DecodeError::new(err.kind(), &err, offset, max_len)
}

fn scan_error(err: ScanError<BuildError>, max_len: usize) -> DecodeError {
    let offset = Some(err.offset);
    match err.source {
        ScanErrorSource::Syntax(e @ SyntaxError::Lexical(_)) => {
            DecodeError::new(ErrorKind::Lexical, &e, offset, max_len)
        }
        ScanErrorSource::Syntax(e @ SyntaxError::Structural(_)) => {
            DecodeError::new(ErrorKind::Structural, &e, offset, max_len)
        }
        ScanErrorSource::Exhausted => DecodeError::new(
            ErrorKind::ResourceExhausted,
            &"out of memory while allocating scanner state",
            offset,
            max_len,
        ),
        ScanErrorSource::Sink(e) => build_error(e, offset, max_len),
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use test_log::test;

    use super::*;

    #[test]
    fn builder_errors_keep_their_kind() {
        let options = DecodeOptions {
            max_depth: 1,
            ..DecodeOptions::default()
        };
        let err = decode_with(b"[[]]", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(err.offset(), Some(1));
        assert_eq!(
            err.to_string(),
            "resource exhausted: maximum nesting depth of 1 exceeded"
        );
    }

    #[test]
    fn messages_respect_the_length_bound() {
        let options = DecodeOptions {
            max_error_len: 7,
            ..DecodeOptions::default()
        };
        let err = decode_with(b"", &options).unwrap_err();
        assert_eq!(err.message(), "prematu");
    }

    #[test]
    fn zero_depth_still_decodes_scalars() {
        let options = DecodeOptions {
            max_depth: 0,
            ..DecodeOptions::default()
        };
        assert_eq!(decode_with(b"true", &options), Ok(Value::Bool(true)));
        assert_eq!(
            decode_with(b"[]", &options).unwrap_err().kind(),
            ErrorKind::ResourceExhausted
        );
    }
}
