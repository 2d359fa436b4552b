//! Named-label to positional-placeholder rewriting.
//!
//! Postgres only understands `$1, $2, ...`. Statements carry `:name` labels, so before
//! preparing, labels are replaced by positional placeholders and the label order is kept so
//! values can be bound by position at execution time.

use std::fmt::Write;

/// Replace `:name` labels with `$n` placeholders.
///
/// Returns the rewritten SQL and the labels (with their `:` marker) in placeholder order.
/// A repeated label reuses its placeholder. Quoted literals and identifiers, `E'..'` escape
/// strings, `$tag$..$tag$` bodies, comments and `::type` casts are skipped.
pub fn rewrite_named_params(sql: &str) -> (String, Vec<String>) {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(sql.len());
    let mut labels: Vec<String> = Vec::new();
    let mut copied = 0;
    let mut i = 0;

    while i < len {
        match bytes[i] {
            q @ (b'\'' | b'"') => i = skip_quoted(bytes, i, q),
            b'E' | b'e' if bytes.get(i + 1) == Some(&b'\'') && !follows_word(bytes, i) => {
                i = skip_escape_string(bytes, i + 1);
            }
            b'$' if !follows_word(bytes, i) => match dollar_tag(sql, i) {
                Some(tag) => {
                    let body = i + tag.len();
                    i = sql[body..].find(tag).map_or(len, |p| body + p + tag.len());
                }
                None => i += 1,
            },
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = sql[i..].find('\n').map_or(len, |p| i + p + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = sql[i + 2..].find("*/").map_or(len, |p| i + 2 + p + 2);
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' if bytes
                .get(i + 1)
                .is_some_and(|b| *b == b'_' || b.is_ascii_alphabetic()) =>
            {
                let start = i + 1;
                let mut end = start;
                while end < len && (bytes[end] == b'_' || bytes[end].is_ascii_alphanumeric()) {
                    end += 1;
                }
                let label = &sql[i..end];
                let idx = match labels.iter().position(|l| l == label) {
                    Some(pos) => pos + 1,
                    None => {
                        labels.push(label.to_string());
                        labels.len()
                    }
                };
                out.push_str(&sql[copied..i]);
                let _ = write!(out, "${idx}");
                copied = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    out.push_str(&sql[copied..]);
    (out, labels)
}

fn skip_quoted(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut j = open + 1;
    while j < bytes.len() {
        if bytes[j] == quote {
            if bytes.get(j + 1) == Some(&quote) {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

/// `E'...'` where backslash escapes the next byte. `open` is the quote position.
fn skip_escape_string(bytes: &[u8], open: usize) -> usize {
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\'' if bytes.get(j + 1) == Some(&b'\'') => j += 2,
            b'\'' => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// The `$tag$` opening at `start`, if any. Tags follow identifier rules; `$1` is not a tag.
fn dollar_tag(sql: &str, start: usize) -> Option<&str> {
    let bytes = sql.as_bytes();
    let mut j = start + 1;
    if bytes.get(j).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    while j < bytes.len() && is_word(bytes[j]) {
        j += 1;
    }
    (bytes.get(j) == Some(&b'$')).then(|| &sql[start..=j])
}

fn is_word(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

fn follows_word(bytes: &[u8], i: usize) -> bool {
    i > 0 && (is_word(bytes[i - 1]) || bytes[i - 1] == b'$')
}
