use std::fmt;

use crate::error::{ParseError, ParseErrorKind, Result, StructuralError};

/// Records buffered before a batch is flushed to sinks (500). Large enough
/// to amortize per-notification overhead on million-record files.
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Bytes consumed between forced progress notifications (100KB)
pub const DEFAULT_PROGRESS_BYTE_THRESHOLD: u64 = 102_400; // 100KB

/// Configuration for a streaming parse: which elements demarcate the
/// document and how delivery is paced.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Expected name of the outermost XML element
    pub root_element: String,
    /// Name of the repeating element that demarcates one record
    pub event_element: String,
    /// Completed records buffered before a flush; `<= 1` disables batching
    /// and delivers records one at a time
    pub batch_size: usize,
    /// Bytes consumed since the last progress notification that force a new
    /// one even when the percentage has not changed
    pub progress_byte_threshold: u64,
}

impl ParserConfig {
    pub fn new(root_element: impl Into<String>, event_element: impl Into<String>) -> Self {
        Self {
            root_element: root_element.into(),
            event_element: event_element.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            progress_byte_threshold: DEFAULT_PROGRESS_BYTE_THRESHOLD,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_progress_byte_threshold(mut self, threshold: u64) -> Self {
        self.progress_byte_threshold = threshold;
        self
    }

    /// Fails fast on element names the parser could never match.
    pub fn validate(&self) -> Result<()> {
        if self.root_element.is_empty() {
            return Err(ParseError::new(ParseErrorKind::Structural(
                StructuralError::EmptyElementName("root".to_string()),
            )));
        }
        if self.event_element.is_empty() {
            return Err(ParseError::new(ParseErrorKind::Structural(
                StructuralError::EmptyElementName("event".to_string()),
            )));
        }
        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new("events", "event")
    }
}

impl fmt::Display for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParserConfig {{ root: <{}>, event: <{}>, batch_size: {}, progress_byte_threshold: {} }}",
            self.root_element, self.event_element, self.batch_size, self.progress_byte_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_element_names_are_rejected() {
        let config = ParserConfig::new("", "event");
        assert!(config.validate().is_err());

        let config = ParserConfig::new("events", "");
        assert!(config.validate().is_err());

        let config = ParserConfig::default();
        assert!(config.validate().is_ok());
    }
}
