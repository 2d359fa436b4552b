//! Template token scanning.
//!
//! Recognized tokens: `{{columns}}`, `{{tables}}`, `{{pagination}}`, and the argument-taking
//! `{{where}}` / `{{where|KEYWORD}}`, `{{sort}}` / `{{sort|SEPARATOR}}` where the argument is
//! `[A-Za-z .,-]*`. Anything else between braces is left alone.

use std::ops::Range;

pub const COLUMNS: &str = "columns";
pub const TABLES: &str = "tables";
pub const PAGINATION: &str = "pagination";
pub const WHERE: &str = "where";
pub const SORT: &str = "sort";

/// A token located in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte span of the whole token including braces.
    pub span: Range<usize>,
    /// Text after `|`, if the token carried one (possibly empty).
    pub arg: Option<&'a str>,
}

fn is_arg_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, ' ' | '.' | ',' | '-')
}

/// Find the first well-formed `{{name}}` or `{{name|arg}}` token.
pub fn find_token<'a>(template: &'a str, name: &str) -> Option<Token<'a>> {
    let mut from = 0;
    while let Some(pos) = template[from..].find("{{") {
        let start = from + pos;
        let after_open = start + 2;
        from = start + 1;

        let Some(rest) = template[after_open..].strip_prefix(name) else {
            continue;
        };
        if let Some(tail) = rest.strip_prefix("}}") {
            let end = template.len() - tail.len();
            return Some(Token {
                span: start..end,
                arg: None,
            });
        }
        let Some(arg_rest) = rest.strip_prefix('|') else {
            continue;
        };
        let arg_len = arg_rest
            .char_indices()
            .find(|(_, c)| !is_arg_char(*c))
            .map_or(arg_rest.len(), |(i, _)| i);
        let (arg, tail) = arg_rest.split_at(arg_len);
        if let Some(tail) = tail.strip_prefix("}}") {
            let end = template.len() - tail.len();
            return Some(Token {
                span: start..end,
                arg: Some(arg),
            });
        }
    }
    None
}

/// Replace every `{{name}}` with the rendered snippet. `render` runs only if the token occurs.
pub fn replace_all(template: &str, name: &str, render: impl FnOnce() -> String) -> String {
    let token = format!("{{{{{name}}}}}");
    if template.contains(&token) {
        template.replace(&token, &render())
    } else {
        template.to_string()
    }
}

/// Replace the first `{{name}}`/`{{name|arg}}` token with `render(arg)`.
pub fn replace_first_with_arg(
    template: &str,
    name: &str,
    render: impl FnOnce(Option<&str>) -> String,
) -> String {
    match find_token(template, name) {
        Some(token) => {
            let snippet = render(token.arg);
            let mut out = String::with_capacity(template.len() + snippet.len());
            out.push_str(&template[..token.span.start]);
            out.push_str(&snippet);
            out.push_str(&template[token.span.end..]);
            out
        }
        None => template.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_plain_token() {
        let t = "SELECT x {{where}} y";
        let tok = find_token(t, WHERE).unwrap();
        assert_eq!(&t[tok.span.clone()], "{{where}}");
        assert_eq!(tok.arg, None);
    }

    #[test]
    fn finds_token_with_argument() {
        let t = "WHERE a = 1 {{where|AND}}";
        let tok = find_token(t, WHERE).unwrap();
        assert_eq!(tok.arg, Some("AND"));
        assert_eq!(&t[tok.span], "{{where|AND}}");

        let tok = find_token("ORDER BY a {{sort|,}}", SORT).unwrap();
        assert_eq!(tok.arg, Some(","));

        let tok = find_token("{{sort|}}", SORT).unwrap();
        assert_eq!(tok.arg, Some(""));
    }

    #[test]
    fn rejects_malformed_argument() {
        assert_eq!(find_token("{{where|a;b}}", WHERE), None);
        assert_eq!(find_token("{{where|AND", WHERE), None);
        assert_eq!(find_token("{{wherever}}", WHERE), None);
    }

    #[test]
    fn skips_malformed_and_finds_later_token() {
        let t = "{{where|1}} {{where|OR}}";
        let tok = find_token(t, WHERE).unwrap();
        assert_eq!(tok.arg, Some("OR"));
    }

    #[test]
    fn finds_token_inside_extra_braces() {
        let t = "x {{{where}}} y";
        let tok = find_token(t, WHERE).unwrap();
        assert_eq!(tok.span, 3..12);

        let out = replace_first_with_arg("{{{{sort|,}}}}", SORT, |arg| {
            format!("<{}>", arg.unwrap_or_default())
        });
        assert_eq!(out, "{{<,>}}");
    }

    #[test]
    fn braces_around_tokens_behave_alike() {
        let t = "SELECT {{{columns}}} FROM t {{{where}}}";
        let out = replace_all(t, COLUMNS, || "c".into());
        let out = replace_first_with_arg(&out, WHERE, |_| "W".into());
        assert_eq!(out, "SELECT {c} FROM t {W}");
    }

    #[test]
    fn replace_first_only() {
        let out = replace_first_with_arg("{{sort}} {{sort}}", SORT, |_| "X".into());
        assert_eq!(out, "X {{sort}}");
    }

    #[test]
    fn replace_all_skips_render_when_absent() {
        let out = replace_all("no tokens", COLUMNS, || panic!("should not render"));
        assert_eq!(out, "no tokens");
        let out = replace_all("{{columns}}|{{columns}}", COLUMNS, || "c".into());
        assert_eq!(out, "c|c");
    }

    #[test]
    fn unknown_tokens_untouched() {
        let out = replace_first_with_arg("DELETE FROM {{table}}", WHERE, |_| "W".into());
        assert_eq!(out, "DELETE FROM {{table}}");
    }
}
