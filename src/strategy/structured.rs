//! Strategy 1: locate the full anchored span, split it into top-level
//! entries, and coerce each entry. The strictest of the four; it requires
//! an explicit, balanced literal behind one of the conventional anchors.

use crate::coerce;
use crate::locate;
use crate::options::{ParseOptions, StepBudget};
use crate::record::ParsedRecord;
use crate::split;

pub(super) fn extract(text: &str, options: &ParseOptions) -> Option<ParsedRecord> {
    let span = locate::locate_span(text)?;
    let mut budget = StepBudget::new(options.step_budget);
    let entries = split::split_entries(span.body, &mut budget).ok()?;

    let mut record = ParsedRecord::new();
    for entry in entries {
        let Some((key_part, value_part)) = split::split_arrow(entry) else {
            continue;
        };
        let Some(key) = coerce::first_quoted(key_part) else {
            continue;
        };
        let Some(value) = coerce::coerce(value_part) else {
            continue;
        };
        record.insert(key, value);
    }
    Some(record)
}
