//! The equivalence ladder.
//!
//! Each rung is a rewrite of a token sequence. Rungs are applied
//! cumulatively: comparing at a rung means every earlier rung has been
//! applied too. The first rung at which both sides agree names the kind of
//! difference that separated them.

use std::fmt;

use crate::lexer::Token;
use crate::options::Mode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rung {
    Whitespace,
    Comments,
    QuoteStyle,
    TrailingCommas,
    ExportOrder,
    ImportOrder,
    PropertyOrder,
}

const STRICT: [Rung; 5] = [
    Rung::Whitespace,
    Rung::Comments,
    Rung::QuoteStyle,
    Rung::TrailingCommas,
    Rung::ExportOrder,
];

const RELAXED: [Rung; 7] = [
    Rung::Whitespace,
    Rung::Comments,
    Rung::QuoteStyle,
    Rung::TrailingCommas,
    Rung::ExportOrder,
    Rung::ImportOrder,
    Rung::PropertyOrder,
];

impl Rung {
    /// The rungs that apply in `mode`, in order.
    pub fn ladder(mode: Mode) -> &'static [Rung] {
        match mode {
            Mode::Strict => &STRICT,
            Mode::Relaxed => &RELAXED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Comments => "comments",
            Self::QuoteStyle => "string quote style",
            Self::TrailingCommas => "trailing commas",
            Self::ExportOrder => "export order",
            Self::ImportOrder => "import order",
            Self::PropertyOrder => "object property order",
        }
    }

    /// Rewrite `tokens` so that sequences differing only in this rung's
    /// concern become equal.
    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        match self {
            // Tokens never carry whitespace.
            Self::Whitespace => tokens,
            Self::Comments => tokens.into_iter().filter(|t| !t.is_comment()).collect(),
            Self::QuoteStyle => tokens
                .into_iter()
                .map(|t| match t {
                    Token::Str { value, .. } => Token::Str { quote: '"', value },
                    other => other,
                })
                .collect(),
            Self::TrailingCommas => drop_trailing_commas(tokens),
            Self::ExportOrder => {
                let (mut exports, rest) = partition(&tokens, "export");
                exports.sort();
                rest.into_iter().chain(exports).flatten().collect()
            }
            Self::ImportOrder => {
                let (mut imports, rest) = partition(&tokens, "import");
                imports.sort();
                imports.into_iter().chain(rest).flatten().collect()
            }
            Self::PropertyOrder => sort_properties(&tokens),
        }
    }
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of walking the ladder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// Both sides agree once `rung` has been applied.
    At(Rung),
    /// No rung reconciles them; both sides after the full ladder.
    No { left: Vec<Token>, right: Vec<Token> },
}

/// Walk the ladder for `mode` until both sides agree.
pub fn reconcile(mut left: Vec<Token>, mut right: Vec<Token>, mode: Mode) -> Reconciled {
    for rung in Rung::ladder(mode) {
        left = rung.apply(left);
        right = rung.apply(right);
        if left == right {
            return Reconciled::At(*rung);
        }
    }
    Reconciled::No { left, right }
}

fn is_closer(token: &Token) -> bool {
    token.is_punct("}") || token.is_punct("]") || token.is_punct(")")
}

fn drop_trailing_commas(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for (idx, token) in tokens.iter().enumerate() {
        if token.is_punct(",") && tokens.get(idx + 1).is_some_and(is_closer) {
            continue;
        }
        out.push(token.clone());
    }
    out
}

/// Index of the bracket closing the one opened at `open`.
pub(crate) fn matching(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct("{") || token.is_punct("[") || token.is_punct("(") {
            depth += 1;
        } else if is_closer(token) {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Whether a statement continues past a `}` that returns to depth zero.
fn continues(next: Option<&Token>) -> bool {
    match next {
        Some(Token::Punct(p)) => matches!(p.as_str(), ";" | "," | ")" | "]" | "."),
        Some(Token::Ident(word)) => word == "as",
        _ => false,
    }
}

/// Split top-level statements.
pub(crate) fn statements(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        current.push(token.clone());
        if token.is_punct("{") || token.is_punct("[") || token.is_punct("(") {
            depth += 1;
        } else if is_closer(token) {
            depth = depth.saturating_sub(1);
        }
        let ends = depth == 0
            && (token.is_punct(";")
                || (token.is_punct("}") && !continues(tokens.get(idx + 1))));
        if ends {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Statements starting with `keyword`, and the rest, each in source order.
fn partition(tokens: &[Token], keyword: &str) -> (Vec<Vec<Token>>, Vec<Vec<Token>>) {
    statements(tokens)
        .into_iter()
        .partition(|s| s.first().is_some_and(|t| t.is_ident(keyword)))
}

/// A `{` opens a property list (object literal, type literal or interface
/// body) rather than a block when it follows one of these.
fn opens_property_list(before: &[Token]) -> bool {
    match before {
        [.., Token::Ident(keyword), Token::Ident(_)] if keyword == "interface" => true,
        [.., Token::Ident(word)] => word == "return",
        [.., Token::Punct(p)] => matches!(p.as_str(), "=" | ":" | "(" | "," | "[" | "?" | "|"),
        _ => false,
    }
}

fn sort_properties(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut idx = 0;
    while idx < tokens.len() {
        let token = &tokens[idx];
        if token.is_punct("{") {
            if let Some(close) = matching(tokens, idx) {
                let inner = sort_properties(&tokens[idx + 1..close]);
                out.push(token.clone());
                if opens_property_list(&tokens[..idx]) {
                    out.extend(sorted_entries(&inner));
                } else {
                    out.extend(inner);
                }
                out.push(tokens[close].clone());
                idx = close + 1;
                continue;
            }
        }
        out.push(token.clone());
        idx += 1;
    }
    out
}

/// Sort the entries of a property list, rejoined with `,`.
fn sorted_entries(inner: &[Token]) -> Vec<Token> {
    let mut entries: Vec<Vec<Token>> = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for token in inner {
        if depth == 0 && (token.is_punct(",") || token.is_punct(";")) {
            entries.push(std::mem::take(&mut current));
            continue;
        }
        if token.is_punct("{") || token.is_punct("[") || token.is_punct("(") {
            depth += 1;
        } else if is_closer(token) {
            depth = depth.saturating_sub(1);
        }
        current.push(token.clone());
    }
    entries.push(current);
    entries.retain(|e| !e.is_empty());
    entries.sort();

    let separator = Token::Punct(",".into());
    let mut out = Vec::new();
    for (idx, entry) in entries.into_iter().enumerate() {
        if idx > 0 {
            out.push(separator.clone());
        }
        out.extend(entry);
    }
    out
}
