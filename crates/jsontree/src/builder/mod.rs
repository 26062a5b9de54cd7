//! Incremental construction of a [`Value`] tree from pushed events.
//!
//! [`TreeBuilder`] keeps an explicit stack of open containers instead of
//! recursing, so it can be driven one event at a time by any source. The
//! bottom of the stack is a synthetic root frame with room for exactly one
//! value; a successful build leaves only that frame, holding the result.
//!
//! Maps and arrays share one storage scheme. A map key is appended as a slot
//! of its own and the frame remembers, with a single flag, that the next
//! value must be fused into that slot as a `(key, value)` entry rather than
//! stored beside it. Fusion happens in place, so member order is document
//! order and repeated keys are kept.

mod frame;

use alloc::vec::Vec;

use bstr::BString;
use log::trace;
use thiserror::Error;

use self::frame::{Frame, FrameKind};
use crate::{error::ErrorKind, event::EventSink, value::Value};

/// Failures detected while assembling the tree.
///
/// A correct event source can only trigger the resource variants; the others
/// report an event sequence that does not describe a single JSON value.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuildError {
    #[error("out of memory while allocating {0}")]
    Exhausted(&'static str),
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),
    #[error("object key has no value")]
    UnresolvedKey,
    #[error("object member is missing its key")]
    ValueWithoutKey,
    #[error("pending key slot was overwritten")]
    MissingKeySlot,
    #[error("object key outside of an object")]
    KeyOutsideMap,
    #[error("object key follows another key")]
    KeyAfterKey,
    #[error("object member inside an array")]
    MemberInArray,
    #[error("{found:?} end marker closes a {open:?} container")]
    Mismatched { open: FrameKind, found: FrameKind },
    #[error("more than one top-level value")]
    RootOccupied,
    #[error("end marker without an open container")]
    RootClosed,
    #[error("{0} containers left open at end of input")]
    Unbalanced(usize),
    #[error("no value in document")]
    EmptyDocument,
}

impl BuildError {
    pub(crate) fn kind(self) -> ErrorKind {
        match self {
            BuildError::Exhausted(_) | BuildError::DepthExceeded(_) => {
                ErrorKind::ResourceExhausted
            }
            _ => ErrorKind::Structural,
        }
    }
}

/// Builds one [`Value`] from a stream of structural events.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    /// Open frames, innermost last. `stack[0]` is the root.
    stack: Vec<Frame>,
    max_depth: usize,
}

impl TreeBuilder {
    /// Creates a builder holding only the root frame. At most `max_depth`
    /// containers may be open at once.
    pub(crate) fn new(max_depth: usize) -> Result<Self, BuildError> {
        let mut stack = Vec::new();
        stack
            .try_reserve(1)
            .map_err(|_| BuildError::Exhausted("container stack"))?;
        stack.push(Frame::root()?);
        Ok(Self { stack, max_depth })
    }

    /// Number of currently open containers, not counting the root.
    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    #[inline]
    fn top(&mut self) -> Result<&mut Frame, BuildError> {
        self.stack.last_mut().ok_or(BuildError::RootClosed)
    }

    #[inline]
    fn append(&mut self, value: Value) -> Result<(), BuildError> {
        self.top()?.append(value)
    }

    fn open(&mut self, kind: FrameKind) -> Result<(), BuildError> {
        if self.depth() >= self.max_depth {
            return Err(BuildError::DepthExceeded(self.max_depth));
        }
        let frame = Frame::open(kind)?;
        self.stack
            .try_reserve(1)
            .map_err(|_| BuildError::Exhausted("container stack"))?;
        self.stack.push(frame);
        trace!("opened {kind:?} frame at depth {}", self.depth());
        Ok(())
    }

    fn close(&mut self, kind: FrameKind) -> Result<(), BuildError> {
        if self.stack.len() <= 1 {
            return Err(BuildError::RootClosed);
        }
        let Some(frame) = self.stack.pop() else {
            return Err(BuildError::RootClosed);
        };
        if frame.kind() != kind {
            return Err(BuildError::Mismatched {
                open: frame.kind(),
                found: kind,
            });
        }
        trace!(
            "closing {kind:?} frame with {} slots at depth {}",
            frame.len(),
            self.depth() + 1
        );
        let value = frame.finish()?;
        self.append(value)
    }

    /// Releases every frame above the root after a failed decode and
    /// returns how many were dropped.
    pub(crate) fn discard(&mut self) -> usize {
        let released = self.depth();
        self.stack.truncate(1);
        released
    }

    /// Returns the decoded value once the event stream has ended.
    pub(crate) fn finish(mut self) -> Result<Value, BuildError> {
        let open = self.depth();
        if open > 0 {
            self.discard();
            return Err(BuildError::Unbalanced(open));
        }
        let Some(root) = self.stack.pop() else {
            return Err(BuildError::RootClosed);
        };
        root.into_root_value()
    }
}

/// Copies event bytes with their exact length, embedded NULs included.
fn copy_bytes(s: &[u8]) -> Result<BString, BuildError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(s.len())
        .map_err(|_| BuildError::Exhausted("string"))?;
    buf.extend_from_slice(s);
    Ok(BString::from(buf))
}

impl EventSink for TreeBuilder {
    type Error = BuildError;

    fn on_null(&mut self) -> Result<(), BuildError> {
        self.append(Value::Null)
    }

    fn on_bool(&mut self, b: bool) -> Result<(), BuildError> {
        self.append(Value::Bool(b))
    }

    fn on_integer(&mut self, i: i64) -> Result<(), BuildError> {
        self.append(Value::Integer(i))
    }

    fn on_double(&mut self, d: f64) -> Result<(), BuildError> {
        self.append(Value::Double(d))
    }

    fn on_string(&mut self, s: &[u8]) -> Result<(), BuildError> {
        let s = copy_bytes(s)?;
        self.append(Value::String(s))
    }

    fn on_map_key(&mut self, s: &[u8]) -> Result<(), BuildError> {
        let key = copy_bytes(s)?;
        self.top()?.append_key(key)
    }

    fn on_start_array(&mut self) -> Result<(), BuildError> {
        self.open(FrameKind::Array)
    }

    fn on_end_array(&mut self) -> Result<(), BuildError> {
        self.close(FrameKind::Array)
    }

    fn on_start_map(&mut self) -> Result<(), BuildError> {
        self.open(FrameKind::Map)
    }

    fn on_end_map(&mut self) -> Result<(), BuildError> {
        self.close(FrameKind::Map)
    }
}
