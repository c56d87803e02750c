//! Strategy 3: line-oriented state machine. Enters the "inside array"
//! state on the first line carrying an arrow operator or an opening
//! literal, then accepts lines holding a single complete
//! `'key' => 'value'` pair. A value that is not closed on its own line is
//! dropped — multi-line string values are a documented limitation of this
//! strategy, not a goal.

use std::sync::LazyLock;

use memchr::memmem;
use regex::Regex;

use crate::coerce;
use crate::options::{ParseOptions, StepBudget};
use crate::record::{ParsedRecord, ScalarValue};

use super::take_quoted;

static OPENING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\breturn\s*[\[(]|^\$\w+\s*=\s*[\[(]").expect("line pattern"));

pub(super) fn extract(text: &str, options: &ParseOptions) -> Option<ParsedRecord> {
    let arrow = memmem::Finder::new("=>");
    let mut budget = StepBudget::new(options.step_budget);
    let mut record = ParsedRecord::new();
    let mut in_array = false;

    for line in text.lines() {
        if !budget.tick() {
            return None;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }

        let arrow_at = arrow.find(line.as_bytes());
        if !in_array {
            if arrow_at.is_some() || OPENING.is_match(line) {
                in_array = true;
            } else {
                continue;
            }
        }
        let Some(idx) = arrow_at else {
            continue;
        };

        let (key_part, rest) = line.split_at(idx);
        let value_part = rest[2..].trim_start();

        let Some(key) = coerce::first_quoted(key_part) else {
            continue;
        };
        // Only a value quoted and closed on this same line is accepted.
        if !value_part.starts_with('\'') && !value_part.starts_with('"') {
            continue;
        }
        let Some((value, _)) = take_quoted(value_part) else {
            continue;
        };
        record.insert(key, ScalarValue::Str(value));
    }

    Some(record)
}
