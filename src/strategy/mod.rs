//! Four alternative extraction pipelines tried in fixed priority order.
//! Each strategy re-derives the span, entries and values from the
//! normalized text on its own, so any one of them can be tested and
//! replaced independently. The first strategy producing a non-empty
//! record wins.

mod lines;
mod nested;
mod structured;
mod tokenizer;

use crate::coerce;
use crate::locate;
use crate::normalize::normalize;
use crate::options::{ParseOptions, StepBudget};
use crate::record::{ParsedRecord, ScalarValue};
use crate::{Error, Result};

type Strategy = fn(&str, &ParseOptions) -> Option<ParsedRecord>;

const CHAIN: [Strategy; 4] = [
    structured::extract,
    tokenizer::extract,
    lines::extract,
    nested::extract,
];

pub fn parse(text: &str, options: &ParseOptions) -> Result<ParsedRecord> {
    let cleaned = normalize(text);

    for strategy in CHAIN {
        if let Some(record) = strategy(&cleaned, options) {
            if !record.is_empty() {
                return Ok(record);
            }
        }
    }

    if locate::anchor_offset(&cleaned).is_none() {
        return Err(Error::SpanNotFound);
    }
    Err(Error::StrategyExhausted)
}

/// Decode the quoted token at the start of `s`. Returns the unescaped
/// text and the number of bytes consumed, quotes included.
fn take_quoted(s: &str) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    let quote = *bytes.first()?;
    if quote != b'\'' && quote != b'"' {
        return None;
    }
    let mut escape = false;
    for (offset, &byte) in bytes[1..].iter().enumerate() {
        if escape {
            escape = false;
        } else if byte == b'\\' {
            escape = true;
        } else if byte == quote {
            let close = 1 + offset;
            return Some((coerce::unescape(&s[1..close]), close + 1));
        }
    }
    None
}

/// Decode the value token at the start of `s`: quoted string, balanced
/// nested literal, or a bare number/keyword run. Returns the scalar and
/// the bytes consumed.
fn take_value(s: &str, budget: &mut StepBudget) -> Option<(ScalarValue, usize)> {
    let first = *s.as_bytes().first()?;

    if first == b'\'' || first == b'"' {
        let (text, len) = take_quoted(s)?;
        return Some((ScalarValue::Str(text), len));
    }

    if first == b'['
        || first == b'('
        || s.get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("array"))
    {
        let len = balanced_len(s, budget)?;
        return coerce::coerce(&s[..len]).map(|value| (value, len));
    }

    let end = s
        .find(|ch: char| matches!(ch, ',' | ']' | ')' | ';') || ch.is_whitespace())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    coerce::coerce(&s[..end]).map(|value| (value, end))
}

/// Length of the balanced bracket token at the start of `s` (including a
/// leading `array` keyword if present), quote-aware, budgeted.
fn balanced_len(s: &str, budget: &mut StepBudget) -> Option<usize> {
    let bytes = s.as_bytes();
    let open_at = bytes.iter().position(|b| *b == b'[' || *b == b'(')?;
    let (open, close) = if bytes[open_at] == b'[' {
        (b'[', b']')
    } else {
        (b'(', b')')
    };

    let mut depth: usize = 0;
    let mut quote: Option<u8> = None;
    let mut escape = false;

    for (idx, &byte) in bytes.iter().enumerate().skip(open_at) {
        if !budget.tick() {
            return None;
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
        if byte == b'\'' || byte == b'"' {
            quote = Some(byte);
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(idx + 1);
            }
        }
    }
    None
}
