//! The push interface between an event source and its consumer.
//!
//! A source calls exactly one method per structural token, in document
//! order. Strings and keys are handed over as fully decoded bytes that the
//! sink must copy if it wants to keep them.

/// Receiver of structural JSON events.
pub(crate) trait EventSink {
    type Error;

    fn on_null(&mut self) -> Result<(), Self::Error>;
    fn on_bool(&mut self, b: bool) -> Result<(), Self::Error>;
    fn on_integer(&mut self, i: i64) -> Result<(), Self::Error>;
    fn on_double(&mut self, d: f64) -> Result<(), Self::Error>;
    fn on_string(&mut self, s: &[u8]) -> Result<(), Self::Error>;
    fn on_map_key(&mut self, s: &[u8]) -> Result<(), Self::Error>;
    fn on_start_array(&mut self) -> Result<(), Self::Error>;
    fn on_end_array(&mut self) -> Result<(), Self::Error>;
    fn on_start_map(&mut self) -> Result<(), Self::Error>;
    fn on_end_map(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
pub(crate) use recording::{Event, Recorder};
