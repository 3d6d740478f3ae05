//! Option-driven normalization, applied before any equivalence rule.

use crate::lexer::Lexeme;
use crate::options::ComparisonOptions;

/// Stands in for a removed comment while lines are rebuilt.
const REMOVED: char = '\u{0}';

/// Normalize `text` according to the enabled options. With neither option
/// enabled the text is returned unchanged.
///
/// Ignoring whitespace compares token sequences, so line endings, indentation
/// and blank-line runs all disappear. Ignoring comments alone keeps the
/// layout and drops the lines that held nothing but a comment.
pub fn normalize(text: &str, lexemes: &[Lexeme], options: &ComparisonOptions) -> String {
    match (options.ignore_whitespace, options.ignore_comments) {
        (false, false) => text.to_string(),
        (true, strip) => lexemes
            .iter()
            .filter(|l| !(strip && l.token.is_comment()))
            .map(|l| l.token.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        (false, true) => strip_comments(text, lexemes),
    }
}

fn strip_comments(text: &str, lexemes: &[Lexeme]) -> String {
    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;
    for lexeme in lexemes.iter().filter(|l| l.token.is_comment()) {
        kept.push_str(&text[cursor..lexeme.span.start]);
        kept.push(REMOVED);
        cursor = lexeme.span.end;
    }
    kept.push_str(&text[cursor..]);

    let mut lines = Vec::new();
    for line in kept.lines() {
        if line.contains(REMOVED) {
            let line = line.replace(REMOVED, "");
            if !line.trim().is_empty() {
                lines.push(line.trim_end().to_string());
            }
        } else {
            lines.push(line.to_string());
        }
    }
    lines.join("\n")
}
