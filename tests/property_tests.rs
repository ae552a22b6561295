#![allow(clippy::unwrap_used)]
#![allow(clippy::as_conversions)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]

use std::io::Cursor;

use proptest::{collection::vec, prelude::*};

use logxml::test_utils::*;

// Strategy for XML-safe element names
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_\\-]{0,15}"
}

// Strategy for field text free of markup characters
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_\\-\\. ]{0,40}"
}

// Strategy for one event: a list of (name, value) fields
fn event_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    vec((name_strategy(), text_strategy()), 0..6)
}

fn render_doc(events: &[Vec<(String, String)>]) -> String {
    let mut doc = String::from("<events>");
    for fields in events {
        doc.push_str("<event>");
        for (name, value) in fields {
            doc.push_str(&format!("<{}>{}</{}>", name, value, name));
        }
        doc.push_str("</event>");
    }
    doc.push_str("</events>");
    doc
}

proptest! {
    // Record count, order, and ids match the document
    #[test]
    fn delivered_records_match_document(events in vec(event_strategy(), 0..40)) {
        let doc = render_doc(&events);
        let collection = parse_str(&doc, &ParserConfig::default()).unwrap();

        prop_assert_eq!(collection.len(), events.len());
        for (i, (record, fields)) in
            collection.records().iter().zip(events.iter()).enumerate()
        {
            prop_assert_eq!(record.id(), i as u64);
            prop_assert_eq!(record.fields().len(), fields.len());
            for ((name, value), (expected_name, expected_value)) in
                record.fields().iter().zip(fields.iter())
            {
                prop_assert_eq!(name.as_str(), expected_name.as_str());
                prop_assert_eq!(value, expected_value);
            }
        }
    }

    // Batch sizes sum to the total and only the last may be short
    #[test]
    fn batch_sizes_are_exact(
        events in vec(event_strategy(), 1..60),
        batch_size in 2usize..10
    ) {
        let doc = render_doc(&events);
        let mut sink = RecordingSink::new();
        let mut parser = StreamingXmlParser::new(
            ParserConfig::default().with_batch_size(batch_size),
        ).unwrap();
        parser.add_sink(&mut sink);
        let len = doc.len() as u64;
        parser.parse_stream(Cursor::new(doc.as_bytes()), Some(len)).unwrap();
        drop(parser);

        let total: usize = sink.batch_sizes.iter().sum();
        prop_assert_eq!(total, events.len());
        if let Some((last, full)) = sink.batch_sizes.split_last() {
            for size in full {
                prop_assert_eq!(*size, batch_size);
            }
            prop_assert!(*last <= batch_size);
        }
    }

    // find_by_key returns the first value stored under a key
    #[test]
    fn find_by_key_round_trips(fields in vec((name_strategy(), text_strategy()), 1..6)) {
        let doc = render_doc(std::slice::from_ref(&fields));
        let collection = parse_str(&doc, &ParserConfig::default()).unwrap();
        let record = collection.get(0).unwrap();

        for (name, _) in &fields {
            let first = fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
                .unwrap();
            prop_assert_eq!(record.find_by_key(name), first);
        }
        prop_assert_eq!(record.find_by_key("definitely-not-a-field"), "");
    }

    // Progress never decreases and ends at 100
    #[test]
    fn progress_is_monotonic(
        events in vec(event_strategy(), 1..80),
        threshold in 16u64..4096
    ) {
        let doc = render_doc(&events);
        let mut sink = RecordingSink::new();
        let mut parser = StreamingXmlParser::new(
            ParserConfig::default().with_progress_byte_threshold(threshold),
        ).unwrap();
        parser.add_sink(&mut sink);
        let len = doc.len() as u64;
        parser.parse_stream(Cursor::new(doc.as_bytes()), Some(len)).unwrap();
        drop(parser);

        for pair in sink.progress.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        prop_assert_eq!(sink.progress.last().copied(), Some(100));
    }
}
