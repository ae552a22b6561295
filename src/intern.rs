//! Field-name interning.
//!
//! Log documents repeat the same handful of field element names across
//! millions of events. Interning them means each record carries cheap
//! `Arc<str>` handles instead of a fresh allocation per field.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A shared, immutable field name.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FieldName(Arc<str>);

impl FieldName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for FieldName {
    fn from(s: String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}

impl PartialEq<str> for FieldName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for FieldName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

pub struct StringInterner {
    strings: RwLock<HashMap<String, Arc<str>>>,
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            strings: RwLock::new(HashMap::new()),
        }
    }

    pub fn intern(&self, s: &str) -> FieldName {
        if let Some(interned) = self.strings.read().get(s) {
            return FieldName(Arc::clone(interned));
        }

        let mut write_guard = self.strings.write();
        let interned = write_guard
            .entry(s.to_string())
            .or_insert_with(|| Arc::from(s))
            .clone();

        FieldName(interned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interned_names_share_storage() {
        let interner = StringInterner::new();
        let a = interner.intern("timestamp");
        let b = interner.intern("timestamp");
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn field_name_compares_against_str() {
        let name = FieldName::from("type");
        assert_eq!(name, "type");
        assert_ne!(name, "info");
    }
}
