use alloc::vec::Vec;

use super::error::{LexicalError, StructuralError, SyntaxError};
use crate::options::IntegerOverflow;

/// Where the bytes of a string token live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Text {
    /// Escape-free, taken straight from the input.
    Borrowed { start: usize, end: usize },
    /// Escape-decoded into the lexer's scratch buffer.
    Buffered,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Token {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    Null,
    True,
    False,
    Integer(i64),
    Double(f64),
    String(Text),
    Eof,
}

/// Splits a byte buffer into JSON tokens.
#[derive(Debug)]
pub(super) struct Lexer<'src> {
    input: &'src [u8],
    pos: usize,
    /// Offset of the first byte of the last token returned.
    token_start: usize,
    scratch: Vec<u8>,
    integer_overflow: IntegerOverflow,
    validate_strings: bool,
}

impl<'src> Lexer<'src> {
    pub(super) fn new(
        input: &'src [u8],
        integer_overflow: IntegerOverflow,
        validate_strings: bool,
    ) -> Self {
        Self {
            input,
            pos: 0,
            token_start: 0,
            scratch: Vec::new(),
            integer_overflow,
            validate_strings,
        }
    }

    #[inline]
    pub(super) fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(super) fn token_start(&self) -> usize {
        self.token_start
    }

    /// Resolves the bytes of a string token returned by the last call to
    /// [`Lexer::next_token`].
    pub(super) fn text(&self, text: Text) -> &[u8] {
        match text {
            Text::Borrowed { start, end } => &self.input[start..end],
            Text::Buffered => &self.scratch,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) -> Result<u8, SyntaxError> {
        let b = self.peek().ok_or(StructuralError::PrematureEof)?;
        self.pos += 1;
        Ok(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    pub(super) fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        self.token_start = self.pos;
        let Some(b) = self.peek() else {
            return Ok(Token::Eof);
        };
        let punct = match b {
            b'{' => Some(Token::LeftBrace),
            b'}' => Some(Token::RightBrace),
            b'[' => Some(Token::LeftBracket),
            b']' => Some(Token::RightBracket),
            b':' => Some(Token::Colon),
            b',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = punct {
            self.pos += 1;
            return Ok(token);
        }
        match b {
            b'"' => {
                self.pos += 1;
                self.lex_string()
            }
            b'-' | b'0'..=b'9' => self.lex_number(),
            b'n' => self.lex_literal(b"null", Token::Null),
            b't' => self.lex_literal(b"true", Token::True),
            b'f' => self.lex_literal(b"false", Token::False),
            _ => Err(LexicalError::InvalidChar.into()),
        }
    }

    fn lex_literal(&mut self, word: &[u8], token: Token) -> Result<Token, SyntaxError> {
        for &expected in word {
            if self.bump()? != expected {
                self.pos -= 1;
                return Err(LexicalError::InvalidLiteral.into());
            }
        }
        Ok(token)
    }

    // ─── strings ───────────────────────────────────────────────────────────

    fn lex_string(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        // Borrow the input directly until the first escape.
        loop {
            match self.peek() {
                None => return Err(StructuralError::PrematureEof.into()),
                Some(b'"') => {
                    let end = self.pos;
                    self.pos += 1;
                    self.check_utf8(&self.input[start..end])?;
                    return Ok(Token::String(Text::Borrowed { start, end }));
                }
                Some(b'\\') => break,
                Some(0..=0x1f) => return Err(LexicalError::ControlCharacter.into()),
                Some(_) => self.pos += 1,
            }
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(&self.input[start..self.pos]);
        loop {
            match self.bump()? {
                b'"' => {
                    self.check_utf8(&self.scratch)?;
                    return Ok(Token::String(Text::Buffered));
                }
                b'\\' => self.lex_escape()?,
                0..=0x1f => {
                    self.pos -= 1;
                    return Err(LexicalError::ControlCharacter.into());
                }
                b => self.scratch.push(b),
            }
        }
    }

    fn lex_escape(&mut self) -> Result<(), SyntaxError> {
        let decoded = match self.bump()? {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => return self.lex_unicode_escape(),
            _ => {
                self.pos -= 1;
                return Err(LexicalError::InvalidEscape.into());
            }
        };
        self.scratch.push(decoded);
        Ok(())
    }

    fn hex4(&mut self) -> Result<u32, SyntaxError> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = char::from(self.bump()?)
                .to_digit(16)
                .ok_or(LexicalError::InvalidUnicodeEscape)?;
            code = (code << 4) | digit;
        }
        Ok(code)
    }

    /// Decodes the payload of a `\u` escape.
    ///
    /// A high surrogate followed by a `\u` low surrogate yields one code
    /// point. A high surrogate without a following `\u` escape decodes to
    /// `?`. Any other lone surrogate keeps its three-byte generalized UTF-8
    /// form.
    fn lex_unicode_escape(&mut self) -> Result<(), SyntaxError> {
        let code = self.hex4()?;
        if !(0xD800..0xDC00).contains(&code) {
            push_code_point(code, &mut self.scratch);
            return Ok(());
        }
        if self.input.get(self.pos..self.pos + 2) != Some(&b"\\u"[..]) {
            self.scratch.push(b'?');
            return Ok(());
        }
        self.pos += 2;
        let low = self.hex4()?;
        if (0xDC00..0xE000).contains(&low) {
            push_code_point(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00), &mut self.scratch);
        } else {
            self.scratch.push(b'?');
            push_code_point(low, &mut self.scratch);
        }
        Ok(())
    }

    fn check_utf8(&self, bytes: &[u8]) -> Result<(), SyntaxError> {
        if self.validate_strings && core::str::from_utf8(bytes).is_err() {
            return Err(LexicalError::InvalidUtf8.into());
        }
        Ok(())
    }

    // ─── numbers ───────────────────────────────────────────────────────────

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }

    /// Requires at least one digit at the current position.
    fn expect_digits(&mut self, missing: LexicalError) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(b'0'..=b'9') => {
                self.skip_digits();
                Ok(())
            }
            Some(_) => Err(missing.into()),
            None => Err(StructuralError::PrematureEof.into()),
        }
    }

    fn lex_number(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let mut is_float = false;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.peek() == Some(b'0') {
            self.pos += 1;
        } else {
            self.expect_digits(LexicalError::MissingDigitAfterMinus)?;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            is_float = true;
            self.expect_digits(LexicalError::MissingDigitAfterDecimal)?;
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            is_float = true;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            self.expect_digits(LexicalError::MissingDigitAfterExponent)?;
        }

        // The grammar above only admits ASCII.
        let text = core::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| LexicalError::InvalidChar)?;
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Token::Integer(i));
            }
            if self.integer_overflow == IntegerOverflow::Error {
                return Err(LexicalError::IntegerOverflow.into());
            }
        }
        match text.parse::<f64>() {
            Ok(d) if d.is_finite() => Ok(Token::Double(d)),
            _ => Err(LexicalError::NumericOverflow.into()),
        }
    }
}

/// Appends `code` as UTF-8, writing surrogates in their generalized
/// three-byte form.
#[allow(clippy::cast_possible_truncation)]
fn push_code_point(code: u32, out: &mut Vec<u8>) {
    if let Some(c) = char::from_u32(code) {
        let mut buf = [0; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    } else {
        out.extend_from_slice(&[
            0xE0 | (code >> 12) as u8,
            0x80 | ((code >> 6) & 0x3F) as u8,
            0x80 | (code & 0x3F) as u8,
        ]);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rstest::rstest;

    use super::*;

    fn lex_all(input: &[u8]) -> Result<Vec<Token>, SyntaxError> {
        let mut lexer = Lexer::new(input, IntegerOverflow::Error, false);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            if token == Token::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    fn lex_string(input: &[u8]) -> Result<Vec<u8>, SyntaxError> {
        let mut lexer = Lexer::new(input, IntegerOverflow::Error, false);
        let Token::String(text) = lexer.next_token()? else {
            panic!("expected a string token");
        };
        Ok(lexer.text(text).to_vec())
    }

    #[test]
    fn punctuation_and_literals() {
        assert_eq!(
            lex_all(b" { } [ ] : , null true false ").unwrap(),
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Colon,
                Token::Comma,
                Token::Null,
                Token::True,
                Token::False,
            ]
        );
    }

    #[rstest]
    #[case(b"0", Token::Integer(0))]
    #[case(b"-12", Token::Integer(-12))]
    #[case(b"9223372036854775807", Token::Integer(i64::MAX))]
    #[case(b"-9223372036854775808", Token::Integer(i64::MIN))]
    #[case(b"2.5", Token::Double(2.5))]
    #[case(b"-0.0", Token::Double(-0.0))]
    #[case(b"1e3", Token::Double(1000.0))]
    #[case(b"1E-2", Token::Double(0.01))]
    #[case(b"1e+2", Token::Double(100.0))]
    fn numbers(#[case] input: &[u8], #[case] expected: Token) {
        assert_eq!(lex_all(input).unwrap(), vec![expected]);
    }

    #[rstest]
    #[case(b"-", StructuralError::PrematureEof.into())]
    #[case(b"-x", LexicalError::MissingDigitAfterMinus.into())]
    #[case(b"1.", StructuralError::PrematureEof.into())]
    #[case(b"1.e", LexicalError::MissingDigitAfterDecimal.into())]
    #[case(b"1e]", LexicalError::MissingDigitAfterExponent.into())]
    #[case(b"9223372036854775808", LexicalError::IntegerOverflow.into())]
    #[case(b"1e400", LexicalError::NumericOverflow.into())]
    fn malformed_numbers(#[case] input: &[u8], #[case] expected: SyntaxError) {
        assert_eq!(lex_all(input), Err(expected));
    }

    #[test]
    fn integer_overflow_can_widen() {
        let mut lexer = Lexer::new(b"18446744073709551616", IntegerOverflow::Double, false);
        assert_eq!(
            lexer.next_token(),
            Ok(Token::Double(18_446_744_073_709_551_616.0))
        );
    }

    #[test]
    fn leading_zero_ends_the_number() {
        assert_eq!(
            lex_all(b"01").unwrap(),
            vec![Token::Integer(0), Token::Integer(1)]
        );
    }

    #[rstest]
    #[case::plain(br#""abc""#, b"abc")]
    #[case::simple_escapes(br#""\"\\\/\b\f\n\r\t""#, b"\"\\/\x08\x0c\n\r\t")]
    #[case::bmp(br#""\u00e9""#, "é".as_bytes())]
    #[case::nul(br#""a\u0000b""#, b"a\0b")]
    #[case::pair(br#""\ud83d\ude00""#, "😀".as_bytes())]
    #[case::lone_high(br#""\ud83dx""#, b"?x")]
    #[case::high_then_bmp(br#""\ud83d\u0041""#, b"?A")]
    #[case::lone_low(br#""\ude00""#, b"\xed\xb8\x80")]
    #[case::raw_invalid_utf8(b"\"\xff\xfe\"", b"\xff\xfe")]
    fn strings(#[case] input: &[u8], #[case] expected: &[u8]) {
        assert_eq!(lex_string(input).unwrap(), expected);
    }

    #[rstest]
    #[case::unterminated(br#""abc"#, StructuralError::PrematureEof.into())]
    #[case::control(b"\"a\nb\"", LexicalError::ControlCharacter.into())]
    #[case::control_after_escape(b"\"\\n\x01\"", LexicalError::ControlCharacter.into())]
    #[case::bad_escape(br#""\q""#, LexicalError::InvalidEscape.into())]
    #[case::bad_hex(br#""\u12g4""#, LexicalError::InvalidUnicodeEscape.into())]
    fn malformed_strings(#[case] input: &[u8], #[case] expected: SyntaxError) {
        assert_eq!(lex_string(input), Err(expected));
    }

    #[test]
    fn validation_rejects_invalid_utf8() {
        let mut lexer = Lexer::new(b"\"\xff\"", IntegerOverflow::Error, true);
        assert_eq!(lexer.next_token(), Err(LexicalError::InvalidUtf8.into()));

        let mut lexer = Lexer::new(br#""\ude00""#, IntegerOverflow::Error, true);
        assert_eq!(lexer.next_token(), Err(LexicalError::InvalidUtf8.into()));
    }

    #[rstest]
    #[case(b"nul", StructuralError::PrematureEof.into())]
    #[case(b"nulx", LexicalError::InvalidLiteral.into())]
    #[case(b"@", LexicalError::InvalidChar.into())]
    fn bad_tokens(#[case] input: &[u8], #[case] expected: SyntaxError) {
        assert_eq!(lex_all(input), Err(expected));
    }

    #[test]
    fn offsets_track_token_starts() {
        let mut lexer = Lexer::new(b"  [ 12", IntegerOverflow::Error, false);
        assert_eq!(lexer.next_token(), Ok(Token::LeftBracket));
        assert_eq!(lexer.token_start(), 2);
        assert_eq!(lexer.next_token(), Ok(Token::Integer(12)));
        assert_eq!(lexer.token_start(), 4);
        assert_eq!(lexer.offset(), 6);
    }
}
