//! logxml: a streaming XML log-event parser
//!
//! This crate provides functionality to:
//! - Parse large XML log documents incrementally, without building a tree
//! - Deliver decoded records to observers in bounded batches
//! - Report throttled parse progress
//! - Handle errors with detailed context
//!
//! # Examples
//! ```
//! use logxml::{parse_file, ParserConfig, Result};
//!
//! fn example() -> Result<()> {
//!     let config = ParserConfig::new("events", "event");
//!     let collection = parse_file("log.xml", &config)?;
//!     println!("decoded {} events", collection.len());
//!     Ok(())
//! }
//! ```

use tracing::{debug, instrument};

pub mod collection;
pub mod error;
pub mod event;
pub mod intern;
pub mod parser;
pub mod sink;
pub mod test_utils;
pub mod utils;

// Re-exports
pub use collection::{CollectionChange, EventCollection};
pub use error::{
    CollectionError, IOError, MalformedError, ParseError, ParseErrorKind, PatternError, Result,
    StructuralError,
};
pub use event::{compile_pattern, EventRecord};
pub use intern::FieldName;
pub use parser::{ParseSummary, ParserConfig, StreamingXmlParser};
pub use sink::EventSink;

/// Parses an XML log file into a fresh [`EventCollection`].
///
/// Convenience wrapper for callers that do not need their own sinks; see
/// [`StreamingXmlParser`] for the push-based interface.
#[instrument(skip(config))]
pub fn parse_file(path: &str, config: &ParserConfig) -> Result<EventCollection> {
    debug!("parsing event log: {}", path);
    utils::parse_log_file(path, config)
}
