//! The decoded log event record.
//!
//! An [`EventRecord`] is one `<event>` element from the document: a
//! sequential id plus the ordered list of (field name, field value) pairs
//! found inside it. Records are immutable once constructed; they are built
//! exactly once by the parser and handed off to sinks.

use std::hash::{Hash, Hasher};

use regex::Regex;

use crate::error::{ParseError, ParseErrorKind, PatternError, Result};
use crate::intern::FieldName;

/// One structured log entry.
///
/// Field order is document order and duplicate field names are kept as-is;
/// nothing is deduplicated or merged.
#[derive(Debug, Clone)]
pub struct EventRecord {
    id: u64,
    fields: Vec<(FieldName, String)>,
}

impl EventRecord {
    pub fn new(id: u64, fields: Vec<(FieldName, String)>) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Read-only view of the fields, in document order.
    pub fn fields(&self) -> &[(FieldName, String)] {
        &self.fields
    }

    /// Returns the value of the first field named `key`, or `""` if no such
    /// field exists. Linear scan over the field list.
    pub fn find_by_key(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == &key)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Returns the value of the first field whose *value* matches `pattern`.
    ///
    /// `None` means no field matched, which is distinct from a match on an
    /// empty value.
    pub fn find_matching(&self, pattern: &Regex) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, value)| pattern.is_match(value))
            .map(|(_, value)| value.as_str())
    }

    /// Compiles `pattern` and searches field values with it.
    ///
    /// For one-off lookups only; callers scanning many records should
    /// compile once with [`compile_pattern`] and use [`Self::find_matching`].
    pub fn find_matching_pattern(&self, pattern: &str) -> Result<Option<&str>> {
        let regex = compile_pattern(pattern)?;
        Ok(self.find_matching(&regex))
    }
}

/// Compiles a field-value search pattern.
///
/// A pattern the regex engine rejects is reported as a recoverable
/// [`ParseError`], never a panic.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        ParseError::new(ParseErrorKind::Pattern(PatternError::InvalidPattern(
            pattern.to_string(),
        )))
        .with_source(e)
    })
}

// Equality is by id alone. Two records with the same id compare equal even
// if their fields differ; callers that move records around rely on this.
impl PartialEq for EventRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventRecord {}

impl Hash for EventRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
