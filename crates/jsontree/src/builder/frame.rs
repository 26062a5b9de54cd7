use alloc::vec::Vec;

use bstr::BString;

use super::BuildError;
use crate::value::{Array, Object, Value};

/// Slots a fresh array or map frame can hold before its first growth.
pub(crate) const INITIAL_CAPACITY: usize = 16;

/// The opening event a frame was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    /// The synthetic single-slot frame receiving the top-level value.
    Root,
    Array,
    Map,
}

/// One stored position in a frame.
///
/// A map frame alternates `Key` and fused `Entry` slots: a key is appended
/// as its own slot and replaced in place by an entry once its value arrives.
#[derive(Debug)]
pub(crate) enum Slot {
    Value(Value),
    Key(BString),
    Entry(BString, Value),
}

/// An array or object under construction.
#[derive(Debug)]
pub(crate) struct Frame {
    kind: FrameKind,
    slots: Vec<Slot>,
    /// The last slot is a key still waiting for its value.
    pending_key: bool,
}

impl Frame {
    pub(crate) fn root() -> Result<Self, BuildError> {
        Self::with_capacity(FrameKind::Root, 1)
    }

    pub(crate) fn open(kind: FrameKind) -> Result<Self, BuildError> {
        Self::with_capacity(kind, INITIAL_CAPACITY)
    }

    fn with_capacity(kind: FrameKind, capacity: usize) -> Result<Self, BuildError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| BuildError::Exhausted("container storage"))?;
        Ok(Self {
            kind,
            slots,
            pending_key: false,
        })
    }

    #[inline]
    pub(crate) fn kind(&self) -> FrameKind {
        self.kind
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Appends `value`, fusing it with the pending key if there is one.
    pub(crate) fn append(&mut self, value: Value) -> Result<(), BuildError> {
        if self.pending_key {
            let Some(last) = self.slots.last_mut() else {
                return Err(BuildError::MissingKeySlot);
            };
            let Slot::Key(key) = &mut *last else {
                return Err(BuildError::MissingKeySlot);
            };
            let key = core::mem::take(key);
            *last = Slot::Entry(key, value);
            self.pending_key = false;
            return Ok(());
        }

        if self.kind == FrameKind::Map {
            return Err(BuildError::ValueWithoutKey);
        }
        self.push_slot(Slot::Value(value))
    }

    /// Appends `key` as a placeholder slot for the next value.
    pub(crate) fn append_key(&mut self, key: BString) -> Result<(), BuildError> {
        if self.kind != FrameKind::Map {
            return Err(BuildError::KeyOutsideMap);
        }
        if self.pending_key {
            return Err(BuildError::KeyAfterKey);
        }
        self.push_slot(Slot::Key(key))?;
        self.pending_key = true;
        Ok(())
    }

    fn push_slot(&mut self, slot: Slot) -> Result<(), BuildError> {
        // a second top-level value is a protocol violation, not a reason to grow
        if self.kind == FrameKind::Root && !self.slots.is_empty() {
            return Err(BuildError::RootOccupied);
        }
        if self.slots.len() == self.slots.capacity() {
            self.grow()?;
        }
        self.slots.push(slot);
        Ok(())
    }

    /// Doubles the slot capacity.
    fn grow(&mut self) -> Result<(), BuildError> {
        let additional = self.slots.capacity().max(INITIAL_CAPACITY);
        self.slots
            .try_reserve_exact(additional)
            .map_err(|_| BuildError::Exhausted("container storage"))
    }

    /// Converts a closed frame into the finished value it describes.
    pub(crate) fn finish(self) -> Result<Value, BuildError> {
        if self.pending_key {
            return Err(BuildError::UnresolvedKey);
        }
        match self.kind {
            FrameKind::Root => Err(BuildError::RootClosed),
            FrameKind::Array => {
                let mut items = Array::new();
                items
                    .try_reserve_exact(self.slots.len())
                    .map_err(|_| BuildError::Exhausted("array"))?;
                for slot in self.slots {
                    let Slot::Value(v) = slot else {
                        return Err(BuildError::MemberInArray);
                    };
                    items.push(v);
                }
                Ok(Value::Array(items))
            }
            FrameKind::Map => {
                let mut members = Object::new();
                members
                    .try_reserve_exact(self.slots.len())
                    .map_err(|_| BuildError::Exhausted("object"))?;
                for slot in self.slots {
                    let Slot::Entry(k, v) = slot else {
                        return Err(BuildError::UnresolvedKey);
                    };
                    members.push((k, v));
                }
                Ok(Value::Object(members))
            }
        }
    }

    /// Takes the single top-level value out of a root frame.
    pub(crate) fn into_root_value(mut self) -> Result<Value, BuildError> {
        debug_assert_eq!(self.kind, FrameKind::Root);
        match self.slots.pop() {
            Some(Slot::Value(v)) if self.slots.is_empty() => Ok(v),
            Some(_) => Err(BuildError::RootOccupied),
            None => Err(BuildError::EmptyDocument),
        }
    }
}
