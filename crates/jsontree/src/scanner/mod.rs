//! A push-style JSON scanner.
//!
//! [`Scanner`] walks a complete byte buffer and reports every structural
//! token to an [`EventSink`] as soon as it is recognized. It owns the JSON
//! grammar: the sink never sees a key outside an object, an unbalanced end
//! marker, or a second top-level value. Scanning stops at the first error,
//! which carries the byte offset where it was detected.
//!
//! The grammar is tracked with an explicit stack of states, one per open
//! container plus one for the document itself, so arbitrarily deep input is
//! scanned without recursion.

mod error;
mod lexer;

use alloc::vec::Vec;

pub(crate) use error::{ScanError, ScanErrorSource, SyntaxError};
use error::StructuralError;
use lexer::{Lexer, Token};

use crate::{event::EventSink, options::DecodeOptions};

/// Grammar position inside the document or the innermost container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the top-level value.
    Start,
    /// After the top-level value; only whitespace may follow.
    Complete,
    MapStart,
    MapNeedKey,
    MapSep,
    MapNeedVal,
    MapGotVal,
    ArrayStart,
    ArrayNeedVal,
    ArrayGotVal,
}

impl State {
    /// The state to resume in once a value has been read in this state.
    fn after_value(self) -> Self {
        match self {
            State::Start => State::Complete,
            State::MapNeedVal => State::MapGotVal,
            _ => State::ArrayGotVal,
        }
    }
}

/// Drives an [`EventSink`] from a byte buffer holding one JSON document.
#[derive(Debug)]
pub(crate) struct Scanner<'src> {
    lexer: Lexer<'src>,
    states: Vec<State>,
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(input: &'src [u8], options: &DecodeOptions) -> Self {
        Self {
            lexer: Lexer::new(input, options.integer_overflow, options.validate_strings),
            states: Vec::new(),
        }
    }

    /// Scans the whole input, forwarding events to `sink`.
    ///
    /// Succeeds only if the input holds exactly one JSON value, optionally
    /// surrounded by whitespace.
    pub(crate) fn run<S: EventSink>(&mut self, sink: &mut S) -> Result<(), ScanError<S::Error>> {
        self.states.clear();
        self.push_state(State::Start)?;

        loop {
            let token = self
                .lexer
                .next_token()
                .map_err(|e| ScanError::syntax(e, self.lexer.offset()))?;
            let at = self.lexer.token_start();
            let Some(&state) = self.states.last() else {
                return Err(ScanError::syntax(StructuralError::TrailingGarbage, at));
            };

            match (state, token) {
                (State::Complete, Token::Eof) => return Ok(()),
                (State::Complete, _) => {
                    return Err(ScanError::syntax(StructuralError::TrailingGarbage, at));
                }
                (_, Token::Eof) => {
                    return Err(ScanError::syntax(StructuralError::PrematureEof, at));
                }

                (State::ArrayStart | State::ArrayGotVal, Token::RightBracket) => {
                    self.states.pop();
                    sink.on_end_array().map_err(|e| ScanError::sink(e, at))?;
                }
                (State::MapStart | State::MapGotVal, Token::RightBrace) => {
                    self.states.pop();
                    sink.on_end_map().map_err(|e| ScanError::sink(e, at))?;
                }

                (State::Start | State::MapNeedVal | State::ArrayStart | State::ArrayNeedVal, _) => {
                    self.value(state, token, sink)?;
                }

                (State::MapStart | State::MapNeedKey, Token::String(text)) => {
                    sink.on_map_key(self.lexer.text(text))
                        .map_err(|e| ScanError::sink(e, at))?;
                    self.set_state(State::MapSep);
                }
                (State::MapStart | State::MapNeedKey, _) => {
                    return Err(ScanError::syntax(StructuralError::InvalidObjectKey, at));
                }

                (State::MapSep, Token::Colon) => self.set_state(State::MapNeedVal),
                (State::MapSep, _) => {
                    return Err(ScanError::syntax(StructuralError::MissingColon, at));
                }

                (State::MapGotVal, Token::Comma) => self.set_state(State::MapNeedKey),
                (State::MapGotVal, _) => {
                    return Err(ScanError::syntax(StructuralError::AfterMapValue, at));
                }

                (State::ArrayGotVal, Token::Comma) => self.set_state(State::ArrayNeedVal),
                (State::ArrayGotVal, _) => {
                    return Err(ScanError::syntax(StructuralError::AfterArrayElement, at));
                }
            }
        }
    }

    /// Handles a token where a value is expected.
    fn value<S: EventSink>(
        &mut self,
        state: State,
        token: Token,
        sink: &mut S,
    ) -> Result<(), ScanError<S::Error>> {
        let at = self.lexer.token_start();
        let emitted = match token {
            Token::Null => sink.on_null(),
            Token::True => sink.on_bool(true),
            Token::False => sink.on_bool(false),
            Token::Integer(i) => sink.on_integer(i),
            Token::Double(d) => sink.on_double(d),
            Token::String(text) => sink.on_string(self.lexer.text(text)),
            Token::LeftBracket => {
                sink.on_start_array().map_err(|e| ScanError::sink(e, at))?;
                self.set_state(state.after_value());
                return self.push_state(State::ArrayStart);
            }
            Token::LeftBrace => {
                sink.on_start_map().map_err(|e| ScanError::sink(e, at))?;
                self.set_state(state.after_value());
                return self.push_state(State::MapStart);
            }
            Token::RightBrace
            | Token::RightBracket
            | Token::Colon
            | Token::Comma
            | Token::Eof => {
                return Err(ScanError::syntax(StructuralError::UnallowedToken, at));
            }
        };
        emitted.map_err(|e| ScanError::sink(e, at))?;
        self.set_state(state.after_value());
        Ok(())
    }

    fn set_state(&mut self, state: State) {
        if let Some(top) = self.states.last_mut() {
            *top = state;
        }
    }

    fn push_state<E>(&mut self, state: State) -> Result<(), ScanError<E>> {
        self.states.try_reserve(1).map_err(|_| ScanError {
            source: ScanErrorSource::Exhausted,
            offset: self.lexer.token_start(),
        })?;
        self.states.push(state);
        Ok(())
    }
}
