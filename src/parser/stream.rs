//! Streaming XML event parser.
//!
//! Consumes a byte stream incrementally through the `quick-xml` tokenizer,
//! validates top-level structure against the configured root and event
//! element names, extracts child-element text as field values, and delivers
//! completed [`EventRecord`]s to registered sinks in bounded batches. The
//! whole document is never materialized.
//!
//! Everything runs synchronously on the calling thread: sink callbacks fire
//! during the parse call, and the stream is owned exclusively by the parser
//! until the call returns. One parse must complete before another begins on
//! the same instance.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};

use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use tracing::{debug, info};

use crate::error::{
    IOError, MalformedError, ParseError, ParseErrorKind, Result, StructuralError,
};
use crate::event::EventRecord;
use crate::intern::{FieldName, StringInterner};
use crate::parser::config::ParserConfig;
use crate::sink::EventSink;

/// Statistics for a completed parse. The records themselves flow through the
/// registered sinks; this is what the call itself returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    /// Records delivered across all batches
    pub records: u64,
    /// Bytes consumed from the stream
    pub bytes: u64,
}

/// Where the state machine is relative to the document structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Before the configured root element has been seen
    Outside,
    /// Root open, scanning for event elements
    InsideRoot,
    /// Inside one event element, accumulating fields
    InsideEvent,
    /// Root closed; parsing finished successfully
    Done,
}

/// Computes and throttles progress percentages from bytes consumed.
///
/// With an unknown stream length, percentage reporting degrades to a single
/// 100 at successful completion.
struct ProgressTracker {
    total: Option<u64>,
    threshold: u64,
    last_pct: Option<u8>,
    bytes_at_last: u64,
}

impl ProgressTracker {
    fn new(total: Option<u64>, threshold: u64) -> Self {
        Self {
            total,
            threshold,
            last_pct: None,
            bytes_at_last: 0,
        }
    }

    /// Returns a percentage to report, or `None` when the notification
    /// should be suppressed.
    fn update(&mut self, bytes: u64) -> Option<u8> {
        let total = self.total?;
        if total == 0 {
            return None;
        }
        let scaled = u128::from(bytes.min(total)) * 100 / u128::from(total);
        let mut pct = u8::try_from(scaled).unwrap_or(100);
        // Guard monotonicity even if byte accounting ever regresses.
        if let Some(last) = self.last_pct {
            pct = pct.max(last);
        }

        let forced = bytes.saturating_sub(self.bytes_at_last) > self.threshold;
        if self.last_pct != Some(pct) || forced {
            self.last_pct = Some(pct);
            self.bytes_at_last = bytes;
            Some(pct)
        } else {
            None
        }
    }

    /// The explicit terminal notification at successful stream end.
    fn finish(&mut self) -> Option<u8> {
        if self.last_pct == Some(100) {
            None
        } else {
            self.last_pct = Some(100);
            Some(100)
        }
    }
}

/// Incremental push-based parser turning an XML byte stream into
/// [`EventRecord`] batches plus progress notifications.
///
/// Sinks are registered as non-owning `&mut` references and must outlive the
/// parse call; the parser never takes ownership of a sink.
pub struct StreamingXmlParser<'a> {
    config: ParserConfig,
    sinks: Vec<&'a mut dyn EventSink>,
}

impl<'a> StreamingXmlParser<'a> {
    /// Creates a parser for the given configuration.
    ///
    /// Fails fast when a configured element name is empty.
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sinks: Vec::new(),
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Registers a sink. Sinks are invoked in registration order.
    pub fn add_sink(&mut self, sink: &'a mut dyn EventSink) {
        self.sinks.push(sink);
    }

    /// Parses an XML log file from disk.
    ///
    /// The file length is taken from metadata so progress can be reported as
    /// a percentage.
    pub fn parse_file(&mut self, path: &str) -> Result<ParseSummary> {
        info!("parsing event log file: {}", path);
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                ParseError::new(ParseErrorKind::IO(IOError::FileNotFound(path.to_string())))
            }
            std::io::ErrorKind::PermissionDenied => ParseError::new(ParseErrorKind::IO(
                IOError::PermissionDenied(path.to_string()),
            )),
            _ => ParseError::new(ParseErrorKind::IO(IOError::ReadError(e.to_string()))),
        })?;
        let total = file.metadata().ok().map(|m| m.len());
        self.parse_stream(BufReader::new(file), total)
    }

    /// Parses from a seekable reader, determining the total length by
    /// seeking to the end and back.
    pub fn parse_reader<R: BufRead + Seek>(&mut self, mut reader: R) -> Result<ParseSummary> {
        let total = reader
            .seek(SeekFrom::End(0))
            .and_then(|len| reader.seek(SeekFrom::Start(0)).map(|_| len))
            .map_err(|e| ParseError::new(ParseErrorKind::IO(IOError::ReadError(e.to_string()))))?;
        self.parse_stream(reader, Some(total))
    }

    /// Core parse loop over a plain byte stream.
    ///
    /// Pass `None` for `total` when the stream length is unknown; percentage
    /// reporting then degrades to a single 100 at successful completion.
    pub fn parse_stream<R: BufRead>(
        &mut self,
        reader: R,
        total: Option<u64>,
    ) -> Result<ParseSummary> {
        self.config.validate()?;
        debug!("starting parse: {}", self.config);

        let mut xml = Reader::from_reader(reader);
        let interner = StringInterner::new();

        let mut state = ParseState::Outside;
        let mut current_field: Option<FieldName> = None;
        let mut text_buf = String::new();
        let mut fields: Vec<(FieldName, String)> = Vec::new();
        // Capacity hint carried over from the previous record
        let mut field_hint = 0usize;
        let mut batch: Vec<EventRecord> = Vec::new();
        let mut next_id = 0u64;
        let mut delivered = 0u64;
        let mut progress = ProgressTracker::new(
            total,
            self.config.progress_byte_threshold,
        );
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let pos = xml.buffer_position();
            let event = xml
                .read_event_into(&mut buf)
                .map_err(|e| map_xml_error(e, xml.buffer_position()))?;

            match event {
                XmlEvent::Start(ref e) => {
                    let name = element_name(e.local_name().as_ref(), pos)?;
                    match state {
                        ParseState::Outside => {
                            if name == self.config.root_element {
                                debug!("root element <{}> found", name);
                                state = ParseState::InsideRoot;
                            } else {
                                // Leading non-matching elements are skipped;
                                // only a root absent at EOF is an error.
                                debug!("skipping element <{}> before root", name);
                            }
                        }
                        ParseState::InsideRoot => {
                            if name == self.config.event_element {
                                state = ParseState::InsideEvent;
                                current_field = None;
                                text_buf.clear();
                                fields = Vec::with_capacity(field_hint);
                            }
                        }
                        ParseState::InsideEvent => {
                            if current_field.is_none() {
                                current_field = Some(interner.intern(&name));
                                text_buf.clear();
                            }
                            // A sub-element nested inside an open field is
                            // not parsed recursively; its text joins the
                            // open field's accumulator.
                        }
                        ParseState::Done => {}
                    }
                }
                XmlEvent::Empty(ref e) => {
                    let name = element_name(e.local_name().as_ref(), pos)?;
                    match state {
                        ParseState::Outside => {
                            if name == self.config.root_element {
                                // <events/>: the root opens and closes in one
                                // token. An empty document, not an error.
                                debug!("root element <{}> is self-closing", name);
                                self.deliver_batch(std::mem::take(&mut batch));
                                if let Some(pct) = progress.finish() {
                                    self.report_progress(pct);
                                }
                                state = ParseState::Done;
                                break;
                            }
                            debug!("skipping element <{}> before root", name);
                        }
                        ParseState::InsideRoot => {
                            if name == self.config.event_element {
                                // <event/>: a record with no fields
                                let record = EventRecord::new(next_id, Vec::new());
                                next_id += 1;
                                delivered += 1;
                                self.push_record(record, &mut batch);
                            }
                        }
                        ParseState::InsideEvent => {
                            if current_field.is_none() {
                                fields.push((interner.intern(&name), String::new()));
                            }
                        }
                        _ => {}
                    }
                }
                XmlEvent::Text(ref e) => {
                    if state == ParseState::InsideEvent && current_field.is_some() {
                        // Tokenizers deliver text in chunks; concatenate,
                        // never overwrite.
                        let chunk = e
                            .unescape()
                            .map_err(|err| map_xml_error(err, xml.buffer_position()))?;
                        text_buf.push_str(&chunk);
                    }
                }
                XmlEvent::CData(e) => {
                    if state == ParseState::InsideEvent && current_field.is_some() {
                        let bytes = e.into_inner();
                        let chunk = std::str::from_utf8(&bytes).map_err(|_| {
                            ParseError::new(ParseErrorKind::Malformed(
                                MalformedError::InvalidEncoding,
                            ))
                            .with_location(pos)
                        })?;
                        text_buf.push_str(chunk);
                    }
                }
                XmlEvent::End(ref e) => {
                    let name = element_name(e.local_name().as_ref(), pos)?;
                    match state {
                        ParseState::InsideEvent => {
                            let closes_field = current_field
                                .as_ref()
                                .map(|f| f.as_str() == name)
                                .unwrap_or(false);
                            if closes_field {
                                if let Some(field) = current_field.take() {
                                    fields.push((field, std::mem::take(&mut text_buf)));
                                }
                            } else if name == self.config.event_element {
                                let record =
                                    EventRecord::new(next_id, std::mem::take(&mut fields));
                                field_hint = record.fields().len();
                                next_id += 1;
                                delivered += 1;
                                current_field = None;
                                text_buf.clear();
                                state = ParseState::InsideRoot;
                                self.push_record(record, &mut batch);
                            }
                            // Closing tags of nested sub-elements are ignored.
                        }
                        ParseState::InsideRoot => {
                            if name == self.config.root_element {
                                // Successful completion: flush the partial
                                // terminal batch, then the explicit 100%.
                                self.deliver_batch(std::mem::take(&mut batch));
                                if let Some(pct) = progress.finish() {
                                    self.report_progress(pct);
                                }
                                state = ParseState::Done;
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                XmlEvent::Eof => {
                    let pos = xml.buffer_position();
                    return Err(match state {
                        ParseState::Outside => ParseError::new(ParseErrorKind::Structural(
                            StructuralError::RootNotFound(self.config.root_element.clone()),
                        ))
                        .with_location(pos),
                        ParseState::InsideEvent => ParseError::new(ParseErrorKind::Malformed(
                            MalformedError::UnexpectedEof(format!(
                                "stream ended inside an open <{}> element",
                                self.config.event_element
                            )),
                        ))
                        .with_location(pos),
                        ParseState::InsideRoot => ParseError::new(ParseErrorKind::Malformed(
                            MalformedError::UnexpectedEof(format!(
                                "root element <{}> was never closed",
                                self.config.root_element
                            )),
                        ))
                        .with_location(pos),
                        // Unreachable in practice: Done breaks out of the loop.
                        ParseState::Done => ParseError::new(ParseErrorKind::Malformed(
                            MalformedError::UnexpectedEof("trailing end of stream".to_string()),
                        ))
                        .with_location(pos),
                    });
                }
                // Declarations, comments, processing instructions and
                // doctypes carry no event data.
                _ => {}
            }

            if let Some(pct) = progress.update(xml.buffer_position()) {
                self.report_progress(pct);
            }
        }

        let bytes = xml.buffer_position();
        info!("parse finished: {} records, {} bytes", delivered, bytes);
        Ok(ParseSummary {
            records: delivered,
            bytes,
        })
    }

    /// Buffers a completed record, flushing when the batch fills. With
    /// batching disabled the record is delivered immediately.
    fn push_record(&mut self, record: EventRecord, batch: &mut Vec<EventRecord>) {
        if self.config.batch_size <= 1 {
            self.deliver_event(record);
            return;
        }
        batch.push(record);
        if batch.len() >= self.config.batch_size {
            self.deliver_batch(std::mem::take(batch));
        }
    }

    /// Fans a batch out to all sinks: every sink but the last gets its own
    /// copy, the last gets the batch by move.
    fn deliver_batch(&mut self, batch: Vec<EventRecord>) {
        if batch.is_empty() {
            return;
        }
        debug!("delivering batch of {} records", batch.len());
        if let Some((last, rest)) = self.sinks.split_last_mut() {
            for sink in rest.iter_mut() {
                sink.on_event_batch(batch.clone());
            }
            last.on_event_batch(batch);
        }
    }

    fn deliver_event(&mut self, record: EventRecord) {
        if let Some((last, rest)) = self.sinks.split_last_mut() {
            for sink in rest.iter_mut() {
                sink.on_event(record.clone());
            }
            last.on_event(record);
        }
    }

    fn report_progress(&mut self, percent: u8) {
        for sink in self.sinks.iter_mut() {
            sink.on_progress(percent);
        }
    }
}

impl std::fmt::Debug for StreamingXmlParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingXmlParser")
            .field("config", &self.config)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

fn element_name(bytes: &[u8], pos: u64) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| {
            ParseError::new(ParseErrorKind::Malformed(MalformedError::InvalidEncoding))
                .with_location(pos)
        })
}

fn map_xml_error(err: quick_xml::Error, pos: u64) -> ParseError {
    match err {
        quick_xml::Error::Io(e) => {
            ParseError::new(ParseErrorKind::IO(IOError::ReadError(e.to_string())))
                .with_location(pos)
        }
        other => ParseError::new(ParseErrorKind::Malformed(MalformedError::Syntax(
            other.to_string(),
        )))
        .with_location(pos)
        .with_source(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_throttled_and_monotonic() {
        let mut tracker = ProgressTracker::new(Some(1000), 100);
        assert_eq!(tracker.update(10), Some(1));
        // Same percentage, below byte threshold: suppressed.
        assert_eq!(tracker.update(12), None);
        // Same percentage but byte threshold exceeded: re-reported.
        assert_eq!(tracker.update(150), Some(15));
        assert_eq!(tracker.update(1000), Some(100));
        assert_eq!(tracker.finish(), None);
    }

    #[test]
    fn unknown_total_degrades_to_completion_only() {
        let mut tracker = ProgressTracker::new(None, 100);
        assert_eq!(tracker.update(5000), None);
        assert_eq!(tracker.finish(), Some(100));
    }

    #[test]
    fn zero_length_stream_reports_once() {
        let mut tracker = ProgressTracker::new(Some(0), 100);
        assert_eq!(tracker.update(0), None);
        assert_eq!(tracker.finish(), Some(100));
    }
}
