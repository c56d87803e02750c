use crate::options::ParseOptions;
use crate::record::ParsedRecord;
use crate::{Error, Result};

/// Sanity-check a parsed record before it is trusted. The type system
/// already guarantees the record is a string-keyed map, so the checks
/// left are emptiness, a key-count ceiling (a very large record almost
/// always means a runaway match, not real translation data), and a clean
/// serialization. Returns the key count on success.
pub fn validate(record: &ParsedRecord, options: &ParseOptions) -> Result<usize> {
    if record.is_empty() {
        return Err(Error::validation("record is empty"));
    }
    if record.len() > options.max_keys {
        return Err(Error::validation(format!(
            "too many keys ({} > {}), likely a runaway match",
            record.len(),
            options.max_keys
        )));
    }
    serde_json::to_string(record)
        .map_err(|err| Error::validation(format!("record failed to serialize: {err}")))?;
    Ok(record.len())
}
