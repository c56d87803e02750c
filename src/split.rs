use smallvec::SmallVec;

use crate::options::StepBudget;
use crate::{Error, Result};

pub type Entries<'a> = SmallVec<[&'a str; 16]>;

/// Split an array-literal body into its top-level `key => value` entries.
///
/// A comma separates entries only when it appears outside quotes and at
/// bracket depth zero, so commas inside string values or nested arrays
/// never split. Whitespace-only entries are dropped. Fails only when the
/// step budget runs out.
pub fn split_entries<'a>(span: &'a str, budget: &mut StepBudget) -> Result<Entries<'a>> {
    let mut entries = Entries::new();
    let mut quote: Option<u8> = None;
    let mut escape = false;
    let mut depth: usize = 0;
    let mut entry_start = 0;

    for (idx, &byte) in span.as_bytes().iter().enumerate() {
        if !budget.tick() {
            return Err(Error::BudgetExhausted);
        }

        if let Some(active) = quote {
            if escape {
                escape = false;
            } else if byte == b'\\' {
                escape = true;
            } else if byte == active {
                quote = None;
            }
            continue;
        }

        match byte {
            b'\'' | b'"' => quote = Some(byte),
            b'[' | b'(' => depth += 1,
            b']' | b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                push_entry(&mut entries, &span[entry_start..idx]);
                entry_start = idx + 1;
            }
            _ => {}
        }
    }

    push_entry(&mut entries, &span[entry_start..]);
    Ok(entries)
}

fn push_entry<'a>(entries: &mut Entries<'a>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        entries.push(trimmed);
    }
}

/// Split one entry at its `=>` operator, quote-aware. Returns the raw key
/// part and value part, untrimmed.
pub fn split_arrow(entry: &str) -> Option<(&str, &str)> {
    let bytes = entry.as_bytes();
    let mut quote: Option<u8> = None;
    let mut escape = false;

    for idx in 0..bytes.len() {
        let byte = bytes[idx];
        if let Some(active) = quote {
            if escape {
                escape = false;
            } else if byte == b'\\' {
                escape = true;
            } else if byte == active {
                quote = None;
            }
            continue;
        }
        match byte {
            b'\'' | b'"' => quote = Some(byte),
            b'=' if bytes.get(idx + 1) == Some(&b'>') => {
                return Some((&entry[..idx], &entry[idx + 2..]));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_STEP_BUDGET;

    fn split(span: &str) -> Vec<&str> {
        let mut budget = StepBudget::new(DEFAULT_STEP_BUDGET);
        split_entries(span, &mut budget).unwrap().to_vec()
    }

    #[test]
    fn splits_simple_entries() {
        assert_eq!(
            split("'a' => 'b', 'c' => 'd'"),
            vec!["'a' => 'b'", "'c' => 'd'"]
        );
    }

    #[test]
    fn comma_inside_string_does_not_split() {
        assert_eq!(split("'k' => 'a, b'"), vec!["'k' => 'a, b'"]);
    }

    #[test]
    fn comma_inside_nested_array_does_not_split() {
        assert_eq!(
            split("'k' => ['x' => '1', 'y' => '2'], 'l' => 'v'"),
            vec!["'k' => ['x' => '1', 'y' => '2']", "'l' => 'v'"]
        );
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        assert_eq!(split(r"'k' => 'it\'s, fine'"), vec![r"'k' => 'it\'s, fine'"]);
    }

    #[test]
    fn trailing_comma_and_blank_entries_dropped() {
        assert_eq!(split("'a' => 'b',  , \n"), vec!["'a' => 'b'"]);
    }

    #[test]
    fn budget_exhaustion_fails_the_split() {
        let mut budget = StepBudget::new(3);
        assert!(matches!(
            split_entries("'a' => 'b', 'c' => 'd'", &mut budget),
            Err(Error::BudgetExhausted)
        ));
    }

    #[test]
    fn arrow_split_ignores_arrows_in_strings() {
        let (key, value) = split_arrow("'a => b' => 'v'").unwrap();
        assert_eq!(key, "'a => b' ");
        assert_eq!(value, " 'v'");
    }

    #[test]
    fn no_arrow_means_no_split() {
        assert!(split_arrow("'just a string'").is_none());
    }
}
