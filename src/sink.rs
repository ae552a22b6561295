//! The observer contract for parse output.
//!
//! Decoded records and progress ticks are pushed through [`EventSink`]
//! synchronously, on the thread driving the parse. Sinks are registered on
//! the parser as plain `&mut` references; the parser never owns a sink and
//! the caller keeps them alive for the duration of the parse call.

use crate::event::EventRecord;

/// Receives decoded events and progress notifications from the parser.
pub trait EventSink {
    /// A single completed record. Used when batching is disabled
    /// (`batch_size <= 1`).
    fn on_event(&mut self, event: EventRecord);

    /// A batch of completed records in document order. Every batch except
    /// possibly the last has exactly the configured batch size.
    fn on_event_batch(&mut self, batch: Vec<EventRecord>);

    /// Parse progress in percent, 0–100. Non-decreasing; the final value on
    /// a successful parse is always 100.
    fn on_progress(&mut self, percent: u8);
}
