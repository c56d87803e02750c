pub mod coerce;
pub mod error;
pub mod locate;
pub mod normalize;
pub mod options;
pub mod record;
pub mod retry;
pub mod split;
pub mod strategy;
pub mod validate;
pub mod verify;

pub use crate::error::Error;
pub use crate::options::{ParseOptions, StepBudget};
pub use crate::record::{ParsedRecord, ScalarValue};
pub use crate::retry::RetryPolicy;
pub use crate::verify::IntegrityReport;

pub type Result<T> = std::result::Result<T, Error>;

/// Parse a PHP source text containing a language-array literal into an
/// ordered key/value record, using the default options.
pub fn parse(text: &str) -> Result<ParsedRecord> {
    parse_with_options(text, &ParseOptions::default())
}

pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<ParsedRecord> {
    strategy::parse(text, options)
}

/// Sanity-check a parsed record before it is trusted. Returns the key count.
pub fn validate_record(record: &ParsedRecord, options: &ParseOptions) -> Result<usize> {
    validate::validate(record, options)
}

/// Serialize a record to its persisted JSON form: 2-space indentation,
/// insertion order preserved, non-ASCII characters left unescaped.
pub fn to_json_string(record: &ParsedRecord) -> Result<String> {
    serde_json::to_string_pretty(record)
        .map_err(|err| Error::validation(format!("record failed to serialize: {err}")))
}

/// Structurally compare a parsed record against the persisted JSON text
/// that was written from it. The text should be re-read from storage, not
/// taken from memory, so serialization bugs are caught as well.
pub fn verify(original: &ParsedRecord, persisted_text: &str) -> IntegrityReport {
    verify::verify(original, persisted_text)
}
