//! Strategy 4: a single global scan over the whole normalized text, not
//! confined to a located span, accepting nested array values through
//! balanced-bracket matching. The most permissive strategy in the chain
//! and the most prone to false positives from arrow-like text outside the
//! real literal, which is why it runs last.

use memchr::memchr2;

use crate::options::{ParseOptions, StepBudget};
use crate::record::ParsedRecord;

use super::{take_quoted, take_value};

pub(super) fn extract(text: &str, options: &ParseOptions) -> Option<ParsedRecord> {
    let mut budget = StepBudget::new(options.step_budget);
    let mut record = ParsedRecord::new();
    let mut pos = 0;

    while pos < text.len() {
        if !budget.tick() {
            return None;
        }
        let Some(found) = memchr2(b'\'', b'"', text[pos..].as_bytes()) else {
            break;
        };
        let key_at = pos + found;

        let rest = &text[key_at..];
        let Some((key, key_len)) = take_quoted(rest) else {
            pos = key_at + 1;
            continue;
        };
        let after_key = skip_whitespace(rest, key_len);
        if !rest[after_key..].starts_with("=>") {
            pos = key_at + 1;
            continue;
        }
        let value_at = skip_whitespace(rest, after_key + 2);
        let Some((value, value_len)) = take_value(&rest[value_at..], &mut budget) else {
            pos = key_at + 1;
            continue;
        };
        record.insert(key, value);
        pos = key_at + value_at + value_len;
    }

    Some(record)
}

fn skip_whitespace(s: &str, mut idx: usize) -> usize {
    let bytes = s.as_bytes();
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}
