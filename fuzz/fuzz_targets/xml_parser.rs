#![no_main]
use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use logxml::{EventCollection, ParserConfig, StreamingXmlParser};

fuzz_target!(|data: &[u8]| {
    let mut collection = EventCollection::new();
    if let Ok(mut parser) = StreamingXmlParser::new(ParserConfig::default()) {
        parser.add_sink(&mut collection);
        let len = data.len() as u64;
        let _ = parser.parse_stream(Cursor::new(data), Some(len));
    }
});
