//! Strategy 2: find the first anchor position (any assigned variable name
//! qualifies, not just the conventional set), then scan forward for
//! quoted-key/value pairs. A pair is only accepted when it follows the
//! region start, a comma, or a newline, which keeps stray quoted text
//! inside values from being misread as keys.

use memchr::memchr2;

use crate::locate;
use crate::options::{ParseOptions, StepBudget};
use crate::record::{ParsedRecord, ScalarValue};

use super::{take_quoted, take_value};

pub(super) fn extract(text: &str, options: &ParseOptions) -> Option<ParsedRecord> {
    let start = locate::anchor_offset(text)?;
    let region = &text[start..];
    let mut budget = StepBudget::new(options.step_budget);
    let mut record = ParsedRecord::new();
    let mut pos = 0;

    while pos < region.len() {
        if !budget.tick() {
            return None;
        }
        let Some(found) = memchr2(b'\'', b'"', region[pos..].as_bytes()) else {
            break;
        };
        let key_at = pos + found;

        if !follows_separator(region, key_at) {
            pos = key_at + 1;
            continue;
        }
        let Some((key, value, consumed)) = pair_at(&region[key_at..], &mut budget) else {
            pos = key_at + 1;
            continue;
        };
        record.insert(key, value);
        pos = key_at + consumed;
    }

    Some(record)
}

/// Parse `'key' => value` at the start of `s`. Returns the pair and the
/// bytes consumed through the end of the value.
fn pair_at(s: &str, budget: &mut StepBudget) -> Option<(String, ScalarValue, usize)> {
    let (key, key_len) = take_quoted(s)?;
    let after_key = skip_spaces(s, key_len);
    if !s[after_key..].starts_with("=>") {
        return None;
    }
    let value_at = skip_spaces(s, after_key + 2);
    let (value, value_len) = take_value(&s[value_at..], budget)?;
    Some((key, value, value_at + value_len))
}

fn skip_spaces(s: &str, mut idx: usize) -> usize {
    let bytes = s.as_bytes();
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

/// The pair must start the region or follow a comma or newline, possibly
/// with horizontal whitespace in between.
fn follows_separator(region: &str, key_at: usize) -> bool {
    let before = region[..key_at].trim_end_matches([' ', '\t']);
    matches!(before.as_bytes().last(), None | Some(b',' | b'\n' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ScalarValue;

    fn run(text: &str) -> Option<ParsedRecord> {
        extract(text, &ParseOptions::default()).filter(|record| !record.is_empty())
    }

    #[test]
    fn accepts_unconventional_variable_names() {
        let record = run("$app_strings = [\n'a' => 'b',\n'c' => 42\n];").unwrap();
        assert_eq!(record.get("a"), Some(&ScalarValue::Str("b".to_string())));
        assert_eq!(record.get("c"), Some(&ScalarValue::Number("42".to_string())));
    }

    #[test]
    fn nested_value_consumed_opaque() {
        let record = run("return ['menu' => ['a' => '1', 'b' => '2'], 'x' => 'y'];").unwrap();
        assert_eq!(
            record.get("menu"),
            Some(&ScalarValue::Nested("'a' => '1', 'b' => '2'".to_string()))
        );
        // Keys of the nested literal never leak into the top level.
        assert!(record.get("a").is_none());
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn quoted_text_mid_value_is_not_a_key() {
        let record = run("return ['a' => 'b', 'weird' => CONST_X 'c' => 'd'];").unwrap();
        // 'c' follows neither a comma nor a newline, so it is skipped.
        assert!(record.get("c").is_none());
        assert_eq!(record.get("a"), Some(&ScalarValue::Str("b".to_string())));
    }

    #[test]
    fn requires_an_anchor() {
        assert!(run("'a' => 'b'").is_none());
    }
}
