use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use sha2::{Digest, Sha256};

/// A decoded value token. Numbers are kept as their source text to avoid
/// precision drift; nested array literals stay opaque (outer delimiters
/// trimmed, not recursively decoded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    Str(String),
    Number(String),
    Keyword(String),
    Nested(String),
}

impl ScalarValue {
    /// Normalize a true/false/null token to its lowercase keyword form.
    pub fn keyword(raw: &str) -> Self {
        ScalarValue::Keyword(raw.to_ascii_lowercase())
    }

    /// The textual representation used for serialization and for
    /// integrity comparison.
    pub fn as_text(&self) -> &str {
        match self {
            ScalarValue::Str(text)
            | ScalarValue::Number(text)
            | ScalarValue::Keyword(text)
            | ScalarValue::Nested(text) => text,
        }
    }
}

impl Serialize for ScalarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_text())
    }
}

/// An ordered string-keyed mapping extracted from one array literal.
/// Insertion order is preserved for deterministic output; a repeated key
/// overwrites the earlier value in place, mirroring literal-array
/// overwrite semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecord {
    entries: IndexMap<String, ScalarValue>,
}

impl ParsedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins; the key keeps its original position.
    pub fn insert(&mut self, key: String, value: ScalarValue) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&ScalarValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Deterministic digest over the canonical (sorted-key) text form.
    /// Stable across runs and processes, unlike an in-memory hash.
    pub fn digest(&self) -> [u8; 32] {
        let pairs: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_text()))
            .collect();
        digest_text_pairs(pairs)
    }
}

impl Serialize for ParsedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// SHA-256 over length-prefixed key/value text pairs in sorted key order.
/// Both sides of an integrity comparison must go through this same
/// canonicalization.
pub(crate) fn digest_text_pairs<'a>(mut pairs: Vec<(&'a str, &'a str)>) -> [u8; 32] {
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    let mut hasher = Sha256::new();
    for (key, value) in pairs {
        hasher.update((key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_overwrites_in_place() {
        let mut record = ParsedRecord::new();
        record.insert("a".to_string(), ScalarValue::Str("x".to_string()));
        record.insert("b".to_string(), ScalarValue::Str("1".to_string()));
        record.insert("a".to_string(), ScalarValue::Str("y".to_string()));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&ScalarValue::Str("y".to_string())));
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn serializes_all_values_as_text() {
        let mut record = ParsedRecord::new();
        record.insert("s".to_string(), ScalarValue::Str("hi".to_string()));
        record.insert("n".to_string(), ScalarValue::Number("1.50".to_string()));
        record.insert("k".to_string(), ScalarValue::keyword("TRUE"));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"s":"hi","n":"1.50","k":"true"}"#);
    }

    #[test]
    fn digest_ignores_insertion_order() {
        let mut first = ParsedRecord::new();
        first.insert("a".to_string(), ScalarValue::Str("1".to_string()));
        first.insert("b".to_string(), ScalarValue::Str("2".to_string()));

        let mut second = ParsedRecord::new();
        second.insert("b".to_string(), ScalarValue::Str("2".to_string()));
        second.insert("a".to_string(), ScalarValue::Str("1".to_string()));

        assert_eq!(first.digest(), second.digest());
    }

    #[test]
    fn digest_changes_with_values() {
        let mut first = ParsedRecord::new();
        first.insert("a".to_string(), ScalarValue::Str("1".to_string()));
        let mut second = ParsedRecord::new();
        second.insert("a".to_string(), ScalarValue::Str("2".to_string()));
        assert_ne!(first.digest(), second.digest());
    }
}
