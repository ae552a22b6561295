//! Ordered storage for decoded records.
//!
//! [`EventCollection`] is the reference consumer of parse output: an
//! append-oriented container with indexed access, a selection cursor, and
//! change notifications so downstream consumers learn when new data arrives.
//!
//! The collection is not internally synchronized. Concurrent mutation from
//! multiple threads is not supported; callers must confine a collection to
//! one thread at a time.

use crate::error::{CollectionError, ParseError, ParseErrorKind, Result};
use crate::event::EventRecord;
use crate::sink::EventSink;

/// What changed in a collection, for observers that care about one kind of
/// change but not the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    /// Records were appended or the collection was cleared.
    DataChanged,
    /// The selection cursor moved.
    SelectionChanged,
}

type Observer = Box<dyn FnMut(CollectionChange)>;

/// Append-oriented ordered storage for [`EventRecord`]s.
#[derive(Default)]
pub struct EventCollection {
    records: Vec<EventRecord>,
    current_index: Option<usize>,
    last_progress: Option<u8>,
    observers: Vec<Observer>,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record and fires a single data-changed notification.
    pub fn append(&mut self, record: EventRecord) {
        self.records.push(record);
        self.notify(CollectionChange::DataChanged);
    }

    /// Appends a whole batch, then fires exactly one data-changed
    /// notification regardless of how many records arrived.
    pub fn append_batch(&mut self, mut batch: Vec<EventRecord>) {
        if batch.is_empty() {
            return;
        }
        self.records.append(&mut batch);
        self.notify(CollectionChange::DataChanged);
    }

    /// Bounds-checked indexed access.
    pub fn get(&self, index: usize) -> Result<&EventRecord> {
        self.records.get(index).ok_or_else(|| {
            ParseError::new(ParseErrorKind::Collection(CollectionError::IndexOutOfRange {
                index,
                len: self.records.len(),
            }))
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Empties the collection, resets the selection cursor, and fires one
    /// data-changed notification.
    pub fn clear(&mut self) {
        self.records.clear();
        self.current_index = None;
        self.last_progress = None;
        self.notify(CollectionChange::DataChanged);
    }

    /// Moves the selection cursor. `None` unsets it. A set cursor must be a
    /// valid index. Fires a selection-changed notification on success.
    pub fn set_current_index(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(i) = index {
            if i >= self.records.len() {
                return Err(ParseError::new(ParseErrorKind::Collection(
                    CollectionError::SelectionOutOfRange {
                        index: i,
                        len: self.records.len(),
                    },
                )));
            }
        }
        self.current_index = index;
        self.notify(CollectionChange::SelectionChanged);
        Ok(())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The most recent progress percentage delivered to this collection, if
    /// it has been used as a parse sink.
    pub fn last_progress(&self) -> Option<u8> {
        self.last_progress
    }

    /// Registers a change observer. Observers are not deduplicated:
    /// registering the same logical observer twice yields two notifications
    /// per change.
    pub fn add_observer<F>(&mut self, observer: F)
    where
        F: FnMut(CollectionChange) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, change: CollectionChange) {
        for observer in &mut self.observers {
            observer(change);
        }
    }
}

impl EventSink for EventCollection {
    fn on_event(&mut self, event: EventRecord) {
        self.append(event);
    }

    fn on_event_batch(&mut self, batch: Vec<EventRecord>) {
        self.append_batch(batch);
    }

    fn on_progress(&mut self, percent: u8) {
        self.last_progress = Some(percent);
    }
}

impl std::fmt::Debug for EventCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCollection")
            .field("records", &self.records.len())
            .field("current_index", &self.current_index)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> EventRecord {
        EventRecord::new(id, vec![("type".into(), "INFO".to_string())])
    }

    #[test]
    fn append_batch_notifies_once() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let changes = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&changes);

        let mut collection = EventCollection::new();
        collection.add_observer(move |change| {
            if change == CollectionChange::DataChanged {
                *seen.borrow_mut() += 1;
            }
        });

        collection.append_batch(vec![record(0), record(1), record(2)]);
        assert_eq!(collection.len(), 3);
        assert_eq!(*changes.borrow(), 1);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut collection = EventCollection::new();
        collection.append(record(0));
        collection.set_current_index(Some(0)).expect("valid index");
        collection.clear();
        assert!(collection.is_empty());
        assert_eq!(collection.current_index(), None);
    }

    #[test]
    fn get_out_of_range_is_an_error() {
        let collection = EventCollection::new();
        let err = collection.get(0).unwrap_err();
        assert!(matches!(
            err.kind(),
            ParseErrorKind::Collection(CollectionError::IndexOutOfRange { .. })
        ));
    }
}
