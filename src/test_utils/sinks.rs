use crate::event::EventRecord;
use crate::sink::EventSink;

/// A sink that records everything delivered to it, for assertions on
/// delivery order, batch sizes, and progress sequences.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<EventRecord>,
    pub batch_sizes: Vec<usize>,
    pub single_events: usize,
    pub progress: Vec<u8>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: EventRecord) {
        self.single_events += 1;
        self.events.push(event);
    }

    fn on_event_batch(&mut self, batch: Vec<EventRecord>) {
        self.batch_sizes.push(batch.len());
        self.events.extend(batch);
    }

    fn on_progress(&mut self, percent: u8) {
        self.progress.push(percent);
    }
}
