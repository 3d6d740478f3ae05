//! TypeScript literal spelling for the direct renderer.

/// Single-quoted string literal.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Shortest decimal spelling of a number.
pub fn number(value: f64) -> String {
    format!("{value}")
}

/// `['a', 'b']` on one line.
pub fn string_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// `'a' | 'b'`, or `never` for an empty set.
pub fn union<S: AsRef<str>>(members: &[S]) -> String {
    if members.is_empty() {
        return "never".to_string();
    }
    members
        .iter()
        .map(|m| quote(m.as_ref()))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_escapes() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
        assert_eq!(quote("two\nlines"), "'two\\nlines'");
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(number(0.30), "0.3");
        assert_eq!(number(1.0), "1");
        assert_eq!(number(90.0), "90");
    }

    #[test]
    fn unions() {
        assert_eq!(union(&["a", "b"]), "'a' | 'b'");
        assert_eq!(union::<&str>(&[]), "never");
    }
}
