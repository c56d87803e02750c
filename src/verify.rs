use serde::Serialize;
use serde_json::{Map, Value};

use crate::record::{digest_text_pairs, ParsedRecord};

const CHECK_READABILITY: &str = "artifact readability";
const CHECK_KEY_COUNT: &str = "key count comparison";
const CHECK_KEY_PRESENCE: &str = "key presence in both directions";
const CHECK_VALUES: &str = "value comparison";
const CHECK_DIGEST: &str = "content digest comparison";

/// Outcome of one integrity verification. Created fresh per file and
/// discarded after use; it is logged, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub checks_performed: Vec<String>,
    pub issues: Vec<String>,
    pub key_count_match: bool,
    pub value_match: bool,
    pub digest_match: bool,
}

impl IntegrityReport {
    fn new() -> Self {
        Self {
            checks_performed: Vec::new(),
            issues: Vec::new(),
            key_count_match: false,
            value_match: false,
            digest_match: false,
        }
    }

    /// Verification passes only when every individual check passed.
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
            && self.key_count_match
            && self.value_match
            && self.digest_match
    }

    fn check(&mut self, name: &str) {
        self.checks_performed.push(name.to_string());
    }

    fn issue(&mut self, finding: impl Into<String>) {
        self.issues.push(finding.into());
    }
}

/// Re-check a parsed record against the persisted JSON text. The text
/// should come from re-reading the artifact, so serialization and write
/// bugs surface here. Every failed check is enumerated, not just the
/// first.
pub fn verify(original: &ParsedRecord, persisted_text: &str) -> IntegrityReport {
    let mut report = IntegrityReport::new();

    report.check(CHECK_READABILITY);
    let persisted: Map<String, Value> = match serde_json::from_str(persisted_text) {
        Ok(map) => map,
        Err(err) => {
            report.issue(format!("persisted artifact is not a readable JSON map: {err}"));
            return report;
        }
    };

    report.check(CHECK_KEY_COUNT);
    if original.len() == persisted.len() {
        report.key_count_match = true;
    } else {
        report.issue(format!(
            "key count mismatch: original={}, artifact={}",
            original.len(),
            persisted.len()
        ));
    }

    report.check(CHECK_KEY_PRESENCE);
    report.check(CHECK_VALUES);
    let mut values_ok = true;
    for (key, value) in original.iter() {
        match persisted.get(key) {
            None => {
                values_ok = false;
                report.issue(format!("missing key in artifact: {key:?}"));
            }
            Some(found) => {
                // Values are compared by their textual representation:
                // both sides came through the same coercion rules.
                let found_text = value_text(found);
                if found_text != value.as_text() {
                    values_ok = false;
                    report.issue(format!(
                        "value mismatch for key {key:?}: original {:?}, artifact {found_text:?}",
                        value.as_text()
                    ));
                }
            }
        }
    }
    for key in persisted.keys() {
        if !original.contains_key(key.as_str()) {
            values_ok = false;
            report.issue(format!("extra key in artifact: {key:?}"));
        }
    }
    report.value_match = values_ok;

    report.check(CHECK_DIGEST);
    let persisted_texts: Vec<(String, String)> = persisted
        .iter()
        .map(|(key, value)| (key.clone(), value_text(value)))
        .collect();
    let persisted_pairs: Vec<(&str, &str)> = persisted_texts
        .iter()
        .map(|(key, text)| (key.as_str(), text.as_str()))
        .collect();
    if digest_text_pairs(persisted_pairs) == original.digest() {
        report.digest_match = true;
    } else {
        report.issue("content digest mismatch between record and artifact".to_string());
    }

    report
}

/// Textual form of a persisted JSON value. Artifacts written by this
/// crate hold only strings, but a hand-edited file may not.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
