/// Strip PHP script delimiters and comments from a source document,
/// producing clean candidate text for the span locator and strategies.
///
/// Comment removal is quote-aware: `//` inside a string literal (for
/// example a URL value) is left alone. Absence of delimiters or comments
/// is a no-op; this never fails.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut quote: Option<u8> = None;
    let mut escape = false;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];

        if let Some(active) = quote {
            let ch_len = utf8_len(byte);
            out.push_str(&input[i..i + ch_len]);
            if escape {
                escape = false;
            } else if byte == b'\\' {
                escape = true;
            } else if byte == active {
                quote = None;
            }
            i += ch_len;
            continue;
        }

        match byte {
            b'\'' | b'"' => {
                quote = Some(byte);
                out.push(byte as char);
                i += 1;
            }
            b'<' if input[i..].starts_with("<?php") => i += "<?php".len(),
            b'<' if input[i..].starts_with("<?=") => i += "<?=".len(),
            b'?' if input[i..].starts_with("?>") => i += "?>".len(),
            b'/' if input[i..].starts_with("//") => i += line_comment_len(&input[i..]),
            b'#' => i += line_comment_len(&input[i..]),
            b'/' if input[i..].starts_with("/*") => i += block_comment_len(&input[i..]),
            _ => {
                // Multi-byte characters pass through untouched.
                let ch_len = utf8_len(byte);
                out.push_str(&input[i..i + ch_len]);
                i += ch_len;
            }
        }
    }

    out.trim().to_string()
}

/// Bytes up to, but not including, the terminating newline.
fn line_comment_len(rest: &str) -> usize {
    rest.find('\n').unwrap_or(rest.len())
}

/// Bytes through the closing `*/`, or to end of input if unterminated.
fn block_comment_len(rest: &str) -> usize {
    match rest[2..].find("*/") {
        Some(idx) => 2 + idx + 2,
        None => rest.len(),
    }
}

fn utf8_len(byte: u8) -> usize {
    if byte < 0x80 {
        1
    } else if byte >> 5 == 0b110 {
        2
    } else if byte >> 4 == 0b1110 {
        3
    } else {
        4
    }
}
