use thiserror::Error;

/// A malformed or unrepresentable token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexicalError {
    #[error("invalid char in json text")]
    InvalidChar,
    #[error("invalid string in json text")]
    InvalidLiteral,
    #[error("invalid character inside string")]
    ControlCharacter,
    #[error("inside a string, '\\' occurs before a character which it may not")]
    InvalidEscape,
    #[error("invalid (non-hex) character occurs after '\\u' inside string")]
    InvalidUnicodeEscape,
    #[error("invalid bytes in UTF8 string")]
    InvalidUtf8,
    #[error("malformed number, a digit is required after the minus sign")]
    MissingDigitAfterMinus,
    #[error("malformed number, a digit is required after the decimal point")]
    MissingDigitAfterDecimal,
    #[error("malformed number, a digit is required after the exponent")]
    MissingDigitAfterExponent,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("numeric (floating point) overflow")]
    NumericOverflow,
}

/// Well-formed tokens in an order the grammar does not allow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StructuralError {
    #[error("premature EOF")]
    PrematureEof,
    #[error("trailing garbage")]
    TrailingGarbage,
    #[error("unallowed token at this point in JSON text")]
    UnallowedToken,
    #[error("invalid object key (must be a string)")]
    InvalidObjectKey,
    #[error("object key and value must be separated by a colon (':')")]
    MissingColon,
    #[error("after key and value, inside map, I expect ',' or '}}'")]
    AfterMapValue,
    #[error("after array element, I expect ',' or ']'")]
    AfterArrayElement,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyntaxError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// Why scanning stopped.
#[derive(Debug, PartialEq)]
pub(crate) enum ScanErrorSource<E> {
    Syntax(SyntaxError),
    /// The scanner could not grow its own state stack.
    Exhausted,
    /// The sink refused an event.
    Sink(E),
}

/// A scanning failure together with the byte offset it was detected at.
#[derive(Debug, PartialEq)]
pub(crate) struct ScanError<E> {
    pub(crate) source: ScanErrorSource<E>,
    pub(crate) offset: usize,
}

impl<E> ScanError<E> {
    pub(crate) fn syntax(error: impl Into<SyntaxError>, offset: usize) -> Self {
        Self {
            source: ScanErrorSource::Syntax(error.into()),
            offset,
        }
    }

    pub(crate) fn sink(error: E, offset: usize) -> Self {
        Self {
            source: ScanErrorSource::Sink(error),
            offset,
        }
    }
}
