//! Identifier escaping and parameter-name sanitization.
//!
//! - [`quote_ident`] quotes every `.`-separated part of a (possibly qualified) name with a
//!   dialect quote character, doubling embedded quotes. `*` parts stay bare so `t.*` works.
//! - [`sanitize_param_name`] strips everything that is not an ASCII letter, digit or `_`.
//!
//! # Example
//! ```
//! use sqlstitch::ident::{quote_ident, sanitize_param_name};
//!
//! assert_eq!(quote_ident("public.users", '"'), r#""public"."users""#);
//! assert_eq!(sanitize_param_name("user.id"), "userid");
//! ```

/// Quote a dotted identifier using `quote` around each part.
pub fn quote_ident(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(&mut out, name, quote);
    out
}

pub(crate) fn write_quoted(out: &mut String, name: &str, quote: char) {
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if part == "*" {
            out.push('*');
            continue;
        }
        out.push(quote);
        for ch in part.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
    }
}

/// Remove every character that is not an ASCII word character (`[A-Za-z0-9_]`).
///
/// Never fails. Distinct names may collide after stripping (`a.b` and `ab`).
pub fn sanitize_param_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c == '_' || c.is_ascii_alphanumeric())
        .collect()
}

/// Whether `name` is already in sanitized form.
pub fn is_sanitized(name: &str) -> bool {
    name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_simple() {
        assert_eq!(quote_ident("users", '`'), "`users`");
    }

    #[test]
    fn quote_dotted() {
        assert_eq!(quote_ident("u.name", '`'), "`u`.`name`");
        assert_eq!(quote_ident("schema.table.column", '"'), r#""schema"."table"."column""#);
    }

    #[test]
    fn quote_star_left_bare() {
        assert_eq!(quote_ident("u.*", '"'), r#""u".*"#);
        assert_eq!(quote_ident("*", '`'), "*");
    }

    #[test]
    fn quote_doubles_embedded_quote() {
        assert_eq!(quote_ident(r#"has"quote"#, '"'), r#""has""quote""#);
        assert_eq!(quote_ident("a`b", '`'), "`a``b`");
    }

    #[test]
    fn sanitize_strips_non_word() {
        assert_eq!(sanitize_param_name("u.first-name"), "ufirstname");
        assert_eq!(sanitize_param_name(":id"), "id");
        assert_eq!(sanitize_param_name("user_id2"), "user_id2");
        assert_eq!(sanitize_param_name("é$%"), "");
    }

    #[test]
    fn sanitize_collision_is_silent() {
        assert_eq!(sanitize_param_name("a.b"), sanitize_param_name("ab"));
    }

    #[test]
    fn is_sanitized_checks_word_chars() {
        assert!(is_sanitized("user_id"));
        assert!(!is_sanitized("user.id"));
    }
}
