//! Canned XML documents for tests and benchmarks.

/// One well-formed event with three fields.
pub fn simple_event_doc() -> &'static str {
    "<events><event><timestamp>2025-01-14T15:20:55</timestamp>\
     <type>INFO</type><info>Test event</info></event></events>"
}

/// The same document truncated before any closing tags at the end.
pub fn truncated_doc() -> &'static str {
    "<events><event><timestamp>2025-01-14T15:20:55</timestamp>\
     <type>INFO</type><info>Test event</info>"
}

/// A well-formed document whose root is not named `events`.
pub fn mismatched_root_doc() -> &'static str {
    "<log><event><type>INFO</type></event></log>"
}

/// Builds a well-formed document with `count` events, each carrying a
/// `seq` field and a `message` field.
pub fn event_doc(count: usize) -> String {
    let mut doc = String::from("<events>");
    for i in 0..count {
        doc.push_str(&format!(
            "<event><seq>{}</seq><message>entry number {}</message></event>",
            i, i
        ));
    }
    doc.push_str("</events>");
    doc
}
