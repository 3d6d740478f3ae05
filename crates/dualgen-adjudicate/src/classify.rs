//! Classification of differences no equivalence rule reconciles.

use std::collections::{BTreeMap, BTreeSet};

use dualgen_diff::{DiffType, ExportScanner};

use crate::ladder::matching;
use crate::lexer::Token;

/// Words that are never identifiers a rename could touch.
const RESERVED: [&str; 31] = [
    "as", "boolean", "break", "case", "const", "default", "else", "export", "extends", "false",
    "from", "function", "if", "import", "interface", "is", "let", "never", "new", "null",
    "number", "readonly", "return", "string", "switch", "true", "type", "typeof", "undefined",
    "var", "void",
];

/// Pick the diff type and description for an unreconciled file.
///
/// `left_text`/`right_text` are the raw contents; `left`/`right` are the
/// token sequences after the full ladder.
pub fn classify(
    scanner: &ExportScanner,
    left_text: &str,
    right_text: &str,
    left: &[Token],
    right: &[Token],
) -> (DiffType, String) {
    let left_exports = scanner.names(left_text);
    let right_exports = scanner.names(right_text);
    if left_exports != right_exports {
        return (
            DiffType::SemanticDiff,
            export_surface(&left_exports, &right_exports),
        );
    }
    if let Some(renames) = renaming(left, right) {
        let pairs: Vec<String> = renames
            .iter()
            .map(|(from, to)| format!("{from} -> {to}"))
            .collect();
        return (
            DiffType::IdentifierRename,
            format!(
                "internal identifiers renamed ({}); renames are not proven behavior-preserving",
                pairs.join(", ")
            ),
        );
    }
    if blank_function_bodies(left) == blank_function_bodies(right) {
        return (
            DiffType::UnverifiedBehavior,
            "only function bodies differ; behavioral equivalence cannot be checked without execution"
                .to_string(),
        );
    }
    (
        DiffType::SemanticDiff,
        "content differs beyond every equivalence rule".to_string(),
    )
}

fn export_surface(left: &BTreeSet<String>, right: &BTreeSet<String>) -> String {
    let join = |names: Vec<&String>| {
        names
            .into_iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let only_left = join(left.difference(right).collect());
    let only_right = join(right.difference(left).collect());
    match (only_left.is_empty(), only_right.is_empty()) {
        (false, false) => format!("exported surface differs: only left {only_left}; only right {only_right}"),
        (false, true) => format!("exported surface differs: only left {only_left}"),
        _ => format!("exported surface differs: only right {only_right}"),
    }
}

/// A consistent one-to-one renaming of non-reserved identifiers that turns
/// `left` into `right`, if that is the only difference.
fn renaming(left: &[Token], right: &[Token]) -> Option<BTreeMap<String, String>> {
    if left.len() != right.len() {
        return None;
    }
    let mut forward: BTreeMap<String, String> = BTreeMap::new();
    let mut backward: BTreeMap<&str, &str> = BTreeMap::new();
    for (l, r) in left.iter().zip(right) {
        if l == r {
            if let Token::Ident(name) = l {
                // An unchanged use must not also be a rename target or source.
                if forward.get(name).is_some_and(|to| to != name)
                    || backward.get(name.as_str()).is_some_and(|from| *from != name.as_str())
                {
                    return None;
                }
            }
            continue;
        }
        let (Token::Ident(from), Token::Ident(to)) = (l, r) else {
            return None;
        };
        if RESERVED.contains(&from.as_str()) || RESERVED.contains(&to.as_str()) {
            return None;
        }
        match forward.get(from) {
            Some(existing) if existing != to => return None,
            _ => {}
        }
        match backward.get(to.as_str()) {
            Some(existing) if *existing != from.as_str() => return None,
            _ => {}
        }
        forward.insert(from.clone(), to.clone());
        backward.insert(to.as_str(), from.as_str());
    }
    (!forward.is_empty()).then_some(forward)
}

/// Replace the body of every function with `{}`.
pub(crate) fn blank_function_bodies(tokens: &[Token]) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut signature = false;
    let mut idx = 0;
    while idx < tokens.len() {
        let token = &tokens[idx];
        if token.is_ident("function") {
            signature = true;
        }
        let opens_body = token.is_punct("{")
            && match out.last() {
                Some(prev) if prev.is_punct("=>") => true,
                Some(prev) => {
                    signature
                        && !prev.is_punct(":")
                        && !prev.is_punct("|")
                        && !prev.is_punct("&")
                        && !prev.is_punct(",")
                }
                None => false,
            };
        if opens_body {
            if let Some(close) = matching(tokens, idx) {
                out.push(token.clone());
                out.push(tokens[close].clone());
                signature = false;
                idx = close + 1;
                continue;
            }
        }
        if signature && token.is_punct("(") {
            // Parameter lists may hold destructuring braces.
            if let Some(close) = matching(tokens, idx) {
                out.extend_from_slice(&tokens[idx..=close]);
                idx = close + 1;
                continue;
            }
        }
        out.push(token.clone());
        idx += 1;
    }
    out
}
