use std::io::Cursor;

use crate::{
    collection::EventCollection,
    error::Result,
    parser::{config::ParserConfig, stream::StreamingXmlParser},
};

/// Parses an in-memory XML document into a fresh collection.
///
/// The total length is known up front, so progress percentages are reported
/// exactly as they would be for a file on disk.
pub fn parse_str(xml: &str, config: &ParserConfig) -> Result<EventCollection> {
    let mut collection = EventCollection::new();
    let mut parser = StreamingXmlParser::new(config.clone())?;
    parser.add_sink(&mut collection);
    let len = u64::try_from(xml.len()).unwrap_or(u64::MAX);
    parser.parse_stream(Cursor::new(xml.as_bytes()), Some(len))?;
    Ok(collection)
}

/// Parses an XML log file into a fresh collection.
pub fn parse_log_file(path: &str, config: &ParserConfig) -> Result<EventCollection> {
    let mut collection = EventCollection::new();
    let mut parser = StreamingXmlParser::new(config.clone())?;
    parser.add_sink(&mut collection);
    parser.parse_file(path)?;
    Ok(collection)
}
