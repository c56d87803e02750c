use crate::record::ScalarValue;

/// Classify and decode one raw value token, in priority order: quoted
/// string, numeric literal (kept as text), boolean/null keyword, balanced
/// nested array token. Returns None for anything else, so the owning
/// strategy skips the entry rather than aborting the parse.
pub fn coerce(raw: &str) -> Option<ScalarValue> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(inner) = quoted_inner(token) {
        return Some(ScalarValue::Str(unescape(inner)));
    }

    if is_numeric_literal(token) {
        return Some(ScalarValue::Number(token.to_string()));
    }

    if token.eq_ignore_ascii_case("true")
        || token.eq_ignore_ascii_case("false")
        || token.eq_ignore_ascii_case("null")
    {
        return Some(ScalarValue::keyword(token));
    }

    if let Some(inner) = nested_inner(token) {
        return Some(ScalarValue::Nested(inner.trim().to_string()));
    }

    None
}

/// Single-pass unescape of `\"`, `\'` and `\\`. Any other backslash
/// sequence is kept literally.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(next @ ('"' | '\'' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// The decoded text of the first quoted token in `s`, or None when no
/// complete quoted token is present. Used for key extraction.
pub fn first_quoted(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let open = bytes.iter().position(|b| *b == b'\'' || *b == b'"')?;
    let close = closing_quote(bytes, open)?;
    Some(unescape(&s[open + 1..close]))
}

/// Whole-token quoted string: the token opens with a quote and its
/// matching unescaped close is the final character.
fn quoted_inner(token: &str) -> Option<&str> {
    let bytes = token.as_bytes();
    let first = *bytes.first()?;
    if first != b'\'' && first != b'"' {
        return None;
    }
    let close = closing_quote(bytes, 0)?;
    if close != bytes.len() - 1 {
        return None;
    }
    Some(&token[1..close])
}

fn closing_quote(bytes: &[u8], open: usize) -> Option<usize> {
    let quote = bytes[open];
    let mut escape = false;
    for (offset, &byte) in bytes[open + 1..].iter().enumerate() {
        if escape {
            escape = false;
        } else if byte == b'\\' {
            escape = true;
        } else if byte == quote {
            return Some(open + 1 + offset);
        }
    }
    None
}

/// Integer or decimal literal, optional leading minus. Kept as text by
/// the caller, never converted to a numeric type.
fn is_numeric_literal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() {
        return false;
    }
    match digits.split_once('.') {
        None => digits.bytes().all(|b| b.is_ascii_digit()),
        Some((whole, frac)) => {
            !whole.is_empty()
                && !frac.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

/// The body of a balanced `[...]` or `array(...)` token, outer delimiters
/// trimmed. The body itself is not decoded.
fn nested_inner(token: &str) -> Option<&str> {
    let (open, close, body_start) = if token.starts_with('[') {
        (b'[', b']', 1)
    } else if token
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("array"))
    {
        let after = token[5..].trim_start();
        if !after.starts_with('(') {
            return None;
        }
        (b'(', b')', token.len() - after.len() + 1)
    } else if token.starts_with('(') {
        (b'(', b')', 1)
    } else {
        return None;
    };

    if !is_balanced_to_end(token.as_bytes(), body_start, open, close) {
        return None;
    }
    Some(&token[body_start..token.len() - 1])
}

/// True when the token's delimiters balance exactly at its last byte,
/// quote-aware.
fn is_balanced_to_end(bytes: &[u8], body_start: usize, open: u8, close: u8) -> bool {
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
        if byte == b'\'' || byte == b'"' {
            quote = Some(byte);
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return body_start + offset == bytes.len() - 1;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("'hello'", ScalarValue::Str("hello".to_string()))]
    #[case("\"hello\"", ScalarValue::Str("hello".to_string()))]
    #[case(r"'it\'s ok'", ScalarValue::Str("it's ok".to_string()))]
    #[case(r#""say \"hi\"""#, ScalarValue::Str(r#"say "hi""#.to_string()))]
    #[case(r"'back\\slash'", ScalarValue::Str(r"back\slash".to_string()))]
    #[case("42", ScalarValue::Number("42".to_string()))]
    #[case("3.14", ScalarValue::Number("3.14".to_string()))]
    #[case("-7", ScalarValue::Number("-7".to_string()))]
    #[case("TRUE", ScalarValue::Keyword("true".to_string()))]
    #[case("False", ScalarValue::Keyword("false".to_string()))]
    #[case("null", ScalarValue::Keyword("null".to_string()))]
    #[case("['x' => 'y']", ScalarValue::Nested("'x' => 'y'".to_string()))]
    #[case("array('x' => 'y')", ScalarValue::Nested("'x' => 'y'".to_string()))]
    fn coerces_known_tokens(#[case] raw: &str, #[case] expected: ScalarValue) {
        assert_eq!(coerce(raw), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("CONSTANT_NAME")]
    #[case("$variable")]
    #[case("1 + 2")]
    #[case("'unterminated")]
    #[case("3.")]
    #[case("['unbalanced'")]
    fn rejects_unrecognized_tokens(#[case] raw: &str) {
        assert_eq!(coerce(raw), None);
    }

    #[test]
    fn unescape_is_single_pass() {
        // A double backslash decodes to one; the result is not re-scanned.
        assert_eq!(unescape(r"a\\'b"), r"a\'b");
    }

    #[test]
    fn first_quoted_finds_key_in_entry_fragment() {
        assert_eq!(first_quoted("  'greeting' "), Some("greeting".to_string()));
        assert_eq!(first_quoted("no quotes here"), None);
    }
}
