//! Indentation-based document reader.
//!
//! The reader works in two passes: every line is first classified as a
//! `key: value` entry or a `- item`, with its indentation; the classified lines
//! are then folded into a tree of [`Node`]s by indentation.

use dualgen_config::{FieldSource, RawValue};

use crate::error::{ManifestError, ManifestResult};
use crate::scalar::{coerce, inline_list, strip_comment, unquote};

/// A value in the document tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A scalar, or `None` for an explicit null.
    Scalar(Option<RawValue>),
    List(Vec<RawValue>),
    /// Entries in document order.
    Map(Vec<(String, Node)>),
}

impl Node {
    fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// A parsed configuration document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    /// The node at `path`, if every segment exists.
    pub fn node(&self, path: &[&str]) -> Option<&Node> {
        path.iter().try_fold(&self.root, |node, key| node.get(key))
    }
}

impl FieldSource for Document {
    fn value(&self, path: &[&str]) -> Option<RawValue> {
        match self.node(path)? {
            Node::Scalar(value) => value.clone(),
            Node::List(items) => Some(RawValue::List(items.clone())),
            Node::Map(_) => None,
        }
    }

    fn keys(&self, path: &[&str]) -> Vec<String> {
        match self.node(path) {
            Some(Node::Map(entries)) => entries.iter().map(|(k, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
enum LineKind {
    Entry { key: String, value: Option<String> },
    Item(String),
}

#[derive(Debug)]
struct Line {
    number: usize,
    indent: usize,
    kind: LineKind,
}

/// Read a configuration document.
pub fn parse_document(text: &str) -> ManifestResult<Document> {
    let lines = classify(text)?;
    let mut pos = 0;
    let entries = match lines.first() {
        Some(first) if first.indent > 0 => {
            return Err(ManifestError::syntax(
                first.number,
                "top-level keys must not be indented",
            ))
        }
        Some(_) => parse_map(&lines, &mut pos, 0)?,
        None => Vec::new(),
    };
    if let Some(line) = lines.get(pos) {
        return Err(ManifestError::syntax(line.number, "unexpected line"));
    }
    Ok(Document {
        root: Node::Map(entries),
    })
}

fn classify(text: &str) -> ManifestResult<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        let stripped = strip_comment(raw).trim_end();
        let content = stripped.trim_start();
        if content.is_empty() || content == "---" {
            continue;
        }
        let leading = &stripped[..stripped.len() - content.len()];
        if leading.contains('\t') {
            return Err(ManifestError::syntax(number, "tabs are not allowed in indentation"));
        }
        let indent = leading.len();

        let item = content
            .strip_prefix('-')
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace));
        let kind = if let Some(item) = item {
            LineKind::Item(item.trim().to_string())
        } else {
            let (key, value) = split_entry(content)
                .ok_or_else(|| ManifestError::syntax(number, format!("expected 'key: value', found '{content}'")))?;
            let (key, _) = unquote(key.trim());
            if key.is_empty() {
                return Err(ManifestError::syntax(number, "empty key"));
            }
            let value = value.trim();
            LineKind::Entry {
                key: key.to_string(),
                value: (!value.is_empty()).then(|| value.to_string()),
            }
        };
        lines.push(Line {
            number,
            indent,
            kind,
        });
    }
    Ok(lines)
}

/// Split a line into key and value. A quoted key ends at its closing quote
/// when a `:` follows it; otherwise the split is at the first `:` that ends
/// the text or is followed by whitespace.
fn split_entry(content: &str) -> Option<(&str, &str)> {
    if let Some(q) = content.chars().next().filter(|c| *c == '"' || *c == '\'') {
        if let Some(close) = content[1..].find(q) {
            let after = &content[close + 2..];
            let rest = after.trim_start();
            if let Some(value) = rest.strip_prefix(':') {
                if value.is_empty() || value.starts_with(char::is_whitespace) {
                    let colon = content.len() - rest.len();
                    return Some((&content[..colon], value));
                }
            }
        }
    }
    let mut chars = content.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch != ':' {
            continue;
        }
        match chars.peek() {
            None => return Some((&content[..idx], "")),
            Some((_, next)) if next.is_whitespace() => {
                return Some((&content[..idx], &content[idx + 1..]))
            }
            _ => {}
        }
    }
    None
}

fn parse_map(lines: &[Line], pos: &mut usize, indent: usize) -> ManifestResult<Vec<(String, Node)>> {
    let mut entries: Vec<(String, Node)> = Vec::new();
    while let Some(line) = lines.get(*pos) {
        if line.indent < indent {
            break;
        }
        if line.indent > indent {
            return Err(ManifestError::syntax(line.number, "unexpected indentation"));
        }
        let (key, value) = match &line.kind {
            LineKind::Entry { key, value } => (key, value),
            LineKind::Item(_) => {
                return Err(ManifestError::syntax(line.number, "list item without a parent key"))
            }
        };
        if entries.iter().any(|(k, _)| k == key) {
            return Err(ManifestError::syntax(line.number, format!("duplicate key '{key}'")));
        }
        *pos += 1;

        let node = match value {
            Some(text) => match inline_list(text) {
                Some(items) => Node::List(items),
                None => Node::Scalar(coerce(text)),
            },
            None => match lines.get(*pos) {
                // A list may sit at the key's own indentation.
                Some(next) if matches!(next.kind, LineKind::Item(_)) && next.indent >= indent => {
                    Node::List(parse_list(lines, pos, next.indent))
                }
                Some(next) if next.indent > indent => {
                    Node::Map(parse_map(lines, pos, next.indent)?)
                }
                _ => Node::Map(Vec::new()),
            },
        };
        entries.push((key.clone(), node));
    }
    Ok(entries)
}

fn parse_list(lines: &[Line], pos: &mut usize, indent: usize) -> Vec<RawValue> {
    let mut items = Vec::new();
    while let Some(line) = lines.get(*pos) {
        match &line.kind {
            LineKind::Item(text) if line.indent == indent => {
                items.extend(coerce(text));
                *pos += 1;
            }
            _ => break,
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
# sample
version: "2.0.0"
project:
  name: lumen   # trailing comment
  owner: 'platform team'
thresholds:
  critical: 0.3
  low: 0.5
approval:
  threshold: 0.7
  approvers:
    - ana
    - kim
validation:
  levels: [self_assessment, peer_review]
  required:
  - self_assessment
metrics:
  coherence:
    description: "Internal consistency"
    weight: 0.25
    sources:
      - lint
  velocity: 0.15
ci:
  fail_on_mismatch: false
"#;

    #[test]
    fn reads_nested_structure() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(doc.value(&["version"]), Some(RawValue::Text("2.0.0".into())));
        assert_eq!(doc.value(&["project", "name"]), Some(RawValue::Text("lumen".into())));
        assert_eq!(
            doc.value(&["project", "owner"]),
            Some(RawValue::Text("platform team".into()))
        );
        assert_eq!(doc.value(&["thresholds", "low"]), Some(RawValue::Number(0.5)));
        assert_eq!(doc.value(&["ci", "fail_on_mismatch"]), Some(RawValue::Bool(false)));
    }

    #[test]
    fn reads_lists_in_all_forms() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(
            doc.value(&["approval", "approvers"]),
            Some(RawValue::List(vec![
                RawValue::Text("ana".into()),
                RawValue::Text("kim".into())
            ]))
        );
        assert_eq!(
            doc.value(&["validation", "levels"]),
            Some(RawValue::List(vec![
                RawValue::Text("self_assessment".into()),
                RawValue::Text("peer_review".into())
            ]))
        );
        assert_eq!(
            doc.value(&["validation", "required"]),
            Some(RawValue::List(vec![RawValue::Text("self_assessment".into())]))
        );
    }

    #[test]
    fn reads_third_level_and_shorthand() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(doc.keys(&["metrics"]), vec!["coherence", "velocity"]);
        assert_eq!(
            doc.value(&["metrics", "coherence", "weight"]),
            Some(RawValue::Number(0.25))
        );
        assert_eq!(doc.value(&["metrics", "velocity"]), Some(RawValue::Number(0.15)));
        assert_eq!(doc.value(&["metrics"]), None);
    }

    #[test]
    fn top_level_order_is_preserved() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(
            doc.keys(&[]),
            vec!["version", "project", "thresholds", "approval", "validation", "metrics", "ci"]
        );
    }

    #[test]
    fn empty_section_is_empty_map() {
        let doc = parse_document("roles:\nversion: 1\n").unwrap();
        assert_eq!(doc.node(&["roles"]), Some(&Node::Map(vec![])));
        assert!(!doc.contains(&["roles"]));
    }

    #[test]
    fn null_is_absent() {
        let doc = parse_document("version: ~\n").unwrap();
        assert_eq!(doc.value(&["version"]), None);
    }

    #[test]
    fn empty_text_is_empty_document() {
        let doc = parse_document("# nothing\n\n").unwrap();
        assert!(doc.keys(&[]).is_empty());
    }

    #[test]
    fn rejects_line_without_colon() {
        let err = parse_document("version 2\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax { line: 1, .. }));
    }

    #[test]
    fn rejects_tabs() {
        let err = parse_document("project:\n\tname: x\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax { line: 2, .. }));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = parse_document("version: 1\nversion: 2\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax { line: 2, .. }));
    }

    #[test]
    fn rejects_stray_indentation() {
        let err = parse_document("project:\n  name: x\n    owner: y\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax { line: 3, .. }));
    }

    #[test]
    fn rejects_orphan_list_item() {
        let err = parse_document("- a\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax { line: 1, .. }));
    }

    #[test]
    fn apostrophe_in_value_keeps_comment_out() {
        let doc = parse_document("project:\n  name: lumen's app # comment\n").unwrap();
        assert_eq!(
            doc.value(&["project", "name"]),
            Some(RawValue::Text("lumen's app".into()))
        );
    }

    #[test]
    fn null_only_list_is_empty() {
        let doc = parse_document("validation:\n  levels:\n    - ~\n    -\n").unwrap();
        assert_eq!(doc.value(&["validation", "levels"]), Some(RawValue::List(vec![])));
    }

    #[test]
    fn keys_may_contain_colons() {
        let doc = parse_document("a:b: 1\n\"c: d\": 2\n").unwrap();
        assert_eq!(doc.keys(&[]), vec!["a:b", "c: d"]);
        assert_eq!(doc.value(&["a:b"]), Some(RawValue::Number(1.0)));
    }

    #[test]
    fn rejects_deeper_item_after_items() {
        let err = parse_document("approval:\n  approvers:\n    - ana\n      - kim\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax { line: 4, .. }));
    }

    #[test]
    fn colon_inside_value_is_kept() {
        let doc = parse_document("project:\n  description: ratio 1:2\n").unwrap();
        assert_eq!(
            doc.value(&["project", "description"]),
            Some(RawValue::Text("ratio 1:2".into()))
        );
    }
}
