//! Lexical rules for scalar tokens.

use dualgen_config::RawValue;

/// Characters after which a quote opens a quoted span.
const QUOTE_OPENERS: [char; 4] = [':', '-', '[', ','];

fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}

/// Remove an inline `#` comment. A `#` starts a comment at the start of the
/// text or after whitespace, outside quotes. A quote only opens a span when
/// it starts the text or follows one of `: - [ ,` (ignoring whitespace) and
/// is closed later on the line; any other quote is an ordinary character.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut last: Option<char> = None;
    let mut prev_is_space = true;
    for (idx, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if is_quote(ch)
                && last.map_or(true, |c| QUOTE_OPENERS.contains(&c))
                && line[idx + 1..].contains(ch) =>
            {
                quote = Some(ch)
            }
            None if ch == '#' && prev_is_space => return &line[..idx],
            None => {}
        }
        prev_is_space = ch.is_whitespace();
        if !prev_is_space {
            last = Some(ch);
        }
    }
    line
}

/// Strip one pair of matching surrounding quotes. Returns the inner text and
/// whether quotes were present.
pub fn unquote(token: &str) -> (&str, bool) {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return (&token[1..token.len() - 1], true);
        }
    }
    (token, false)
}

/// Optional sign, one or more digits, optionally a dot and one or more digits.
pub fn is_decimal(token: &str) -> bool {
    let body = token.strip_prefix(['-', '+']).unwrap_or(token);
    let (int, frac) = match body.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (body, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

/// `true`/`false` become booleans, decimal-looking tokens become numbers,
/// everything else (including any quoted token) stays text. `null`, `~` and
/// an empty token mean "absent".
pub fn coerce(token: &str) -> Option<RawValue> {
    let token = token.trim();
    let (inner, quoted) = unquote(token);
    if quoted {
        return Some(RawValue::Text(inner.to_string()));
    }
    match token {
        "" | "null" | "~" => None,
        "true" => Some(RawValue::Bool(true)),
        "false" => Some(RawValue::Bool(false)),
        _ if is_decimal(token) => token
            .parse::<f64>()
            .ok()
            .map(RawValue::Number)
            .or_else(|| Some(RawValue::Text(token.to_string()))),
        _ => Some(RawValue::Text(token.to_string())),
    }
}

/// Parse `[a, b, "c, d"]`. Commas inside quotes do not split; a quote only
/// opens at the start of an item and only when it is closed. Empty and null
/// items are dropped.
pub fn inline_list(token: &str) -> Option<Vec<RawValue>> {
    let inner = token.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut at_start = true;
    let mut start = 0;
    for (idx, ch) in inner.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == ',' => {
                items.extend(coerce(&inner[start..idx]));
                start = idx + 1;
                at_start = true;
                continue;
            }
            None if at_start && is_quote(ch) && inner[idx + 1..].contains(ch) => {
                quote = Some(ch)
            }
            None => {}
        }
        at_start = at_start && ch.is_whitespace();
    }
    items.extend(coerce(&inner[start..]));
    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_stripping() {
        assert_eq!(strip_comment("low: 0.5 # lower bound"), "low: 0.5 ");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment("name: 'a # b'"), "name: 'a # b'");
        assert_eq!(strip_comment("url: http://x/#frag"), "url: http://x/#frag");
    }

    #[test]
    fn stray_quotes_do_not_hide_comments() {
        assert_eq!(strip_comment("name: lumen's app # comment"), "name: lumen's app ");
        assert_eq!(strip_comment("- it's # gone"), "- it's ");
        assert_eq!(strip_comment("note: say \"hi # there"), "note: say \"hi ");
        assert_eq!(strip_comment("owner: 'o''brien' # x"), "owner: 'o''brien' ");
        assert_eq!(strip_comment("list: [a, 'b # c']"), "list: [a, 'b # c']");
    }

    #[test]
    fn decimal_rules() {
        assert!(is_decimal("0.5"));
        assert!(is_decimal("-3"));
        assert!(is_decimal("+10.25"));
        assert!(!is_decimal("2.0.0"));
        assert!(!is_decimal(".5"));
        assert!(!is_decimal("5."));
        assert!(!is_decimal("1e3"));
        assert!(!is_decimal("-"));
    }

    #[test]
    fn coercion() {
        assert_eq!(coerce("true"), Some(RawValue::Bool(true)));
        assert_eq!(coerce("0.25"), Some(RawValue::Number(0.25)));
        assert_eq!(coerce("2.0.0"), Some(RawValue::Text("2.0.0".into())));
        assert_eq!(coerce("\"0.25\""), Some(RawValue::Text("0.25".into())));
        assert_eq!(coerce("'true'"), Some(RawValue::Text("true".into())));
        assert_eq!(coerce("~"), None);
        assert_eq!(coerce("null"), None);
        assert_eq!(coerce("  "), None);
    }

    #[test]
    fn inline_lists() {
        assert_eq!(inline_list("[]"), Some(vec![]));
        assert_eq!(
            inline_list("[json, 'a, b', 3]"),
            Some(vec![
                RawValue::Text("json".into()),
                RawValue::Text("a, b".into()),
                RawValue::Number(3.0),
            ])
        );
        assert_eq!(inline_list("json"), None);
        assert_eq!(
            inline_list("[json,,yaml, ~]"),
            Some(vec![RawValue::Text("json".into()), RawValue::Text("yaml".into())])
        );
        assert_eq!(
            inline_list("[it's, b]"),
            Some(vec![RawValue::Text("it's".into()), RawValue::Text("b".into())])
        );
    }
}
