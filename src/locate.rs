use std::sync::LazyLock;

use regex::Regex;

/// The conventional variable names a language file assigns its array to.
const LANG_VARS: &str = "lang|language|data|translations|messages|text|strings";

// Anchor patterns in priority order. `return` forms come first: a file may
// contain both a helper assignment and a final return, and the return is
// the authoritative one.
static RETURN_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\breturn\s*\[").expect("anchor pattern"));
static RETURN_LONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\breturn\s*array\s*\(").expect("anchor pattern"));
static ASSIGN_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\$(?:{LANG_VARS})\s*=\s*\[")).expect("anchor pattern")
});
static ASSIGN_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\$(?:{LANG_VARS})\s*=\s*array\s*\(")).expect("anchor pattern")
});

// Looser anchors used by the tokenizer strategy: any assigned variable
// qualifies, only the position past the opening delimiter matters.
static ANY_ASSIGN_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$\w+\s*=\s*\[").expect("anchor pattern"));
static ANY_ASSIGN_LONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$\w+\s*=\s*array\s*\(").expect("anchor pattern"));

/// The textual span holding the body of an array literal. Byte offsets are
/// into the normalized text the locator was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySpan<'a> {
    pub body: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Find the span between an anchored opening delimiter and its balanced
/// close. Anchors are tried in fixed priority order; the first match wins.
pub fn locate_span(text: &str) -> Option<ArraySpan<'_>> {
    for anchor in [&*RETURN_SHORT, &*RETURN_LONG, &*ASSIGN_SHORT, &*ASSIGN_LONG] {
        if let Some(found) = anchor.find(text) {
            if let Some(span) = balanced_body(text, found.end()) {
                return Some(span);
            }
        }
    }
    None
}

/// Position just past the opening delimiter of the first matching anchor,
/// including assignments to unconventional variable names. Used by the
/// tokenizer strategy, which scans forward rather than needing a full span.
pub fn anchor_offset(text: &str) -> Option<usize> {
    [
        &*RETURN_SHORT,
        &*RETURN_LONG,
        &*ANY_ASSIGN_SHORT,
        &*ANY_ASSIGN_LONG,
    ]
    .iter()
    .find_map(|anchor| anchor.find(text).map(|found| found.end()))
}

/// Scan forward from just past an opening `[`/`(` to the matching close,
/// quote-aware. Returns the body between the delimiters.
fn balanced_body(text: &str, body_start: usize) -> Option<ArraySpan<'_>> {
    let bytes = text.as_bytes();
    let mut depth: usize = 1;
    let mut quote: Option<u8> = None;
    let mut escape = false;

    for (offset, &byte) in bytes[body_start..].iter().enumerate() {
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
            b']' | b')' => {
                depth -= 1;
                if depth == 0 {
                    let end = body_start + offset;
                    return Some(ArraySpan {
                        body: &text[body_start..end],
                        start: body_start,
                        end,
                    });
                }
            }
            _ => {}
        }
    }
    None
}
