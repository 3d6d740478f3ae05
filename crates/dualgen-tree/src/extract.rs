//! Pattern-based field extraction.
//!
//! A single pass over the text. Each line must match either the entry patterns
//! or the item pattern; a stack of open mappings tracks where the line belongs.

use std::collections::BTreeMap;

use regex::Regex;

use dualgen_config::{FieldSource, RawValue};

/// A line the patterns could not place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractError {
    pub line: usize,
    pub message: String,
}

/// Compiled patterns. Build once per extraction run.
pub struct Patterns {
    comment: Regex,
    layout: Regex,
    quoted_key: Regex,
    separator: Regex,
    item: Regex,
    inline_list: Regex,
    list_token: Regex,
    quoted: Regex,
    number: Regex,
}

impl Patterns {
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            // A quote only opens a span after `: - [ ,` or at the line start.
            comment: Regex::new(r#"(?:^|[:\-\[,])\s*(?:"[^"]*"|'[^']*')|(?:^|\s)#"#)?,
            layout: Regex::new(r"^(?P<indent> *)(?P<content>\S.*)$")?,
            quoted_key: Regex::new(r#"^(?P<key>"[^"]*"|'[^']*')\s*:(?P<value>\s.*)?$"#)?,
            separator: Regex::new(r":(?:\s|$)")?,
            item: Regex::new(r"^(?P<indent> *)-(?:\s+(?P<item>.*?))?\s*$")?,
            inline_list: Regex::new(r"^\[(?P<inner>.*)\]$")?,
            list_token: Regex::new(r#"(?P<item>\s*(?:"[^"]*"|'[^']*')?[^,]*)(?:,|$)"#)?,
            quoted: Regex::new(r#"^(?:"(?P<dq>.*)"|'(?P<sq>.*)')$"#)?,
            number: Regex::new(r"^[+-]?[0-9]+(?:\.[0-9]+)?$")?,
        })
    }

    fn strip_comment<'t>(&self, line: &'t str) -> &'t str {
        self.comment
            .find_iter(line)
            .find(|m| m.as_str().ends_with('#'))
            .map_or(line, |m| &line[..m.start()])
    }

    /// Indentation, raw key and value of an entry line. A quoted key ends at
    /// its closing quote when a `:` follows; any other key ends at the first
    /// `:` that ends the line or is followed by whitespace.
    fn entry<'t>(&self, line: &'t str) -> Option<(usize, &'t str, &'t str)> {
        let caps = self.layout.captures(line)?;
        let indent = caps.name("indent").map_or(0, |m| m.as_str().len());
        let content = caps.name("content")?.as_str();
        if let Some(q) = self.quoted_key.captures(content) {
            let key = q.name("key")?.as_str();
            let value = q.name("value").map_or("", |m| m.as_str());
            return Some((indent, key, value.trim()));
        }
        let sep = self.separator.find(content)?;
        Some((
            indent,
            content[..sep.start()].trim(),
            content[sep.end()..].trim(),
        ))
    }

    fn scalar(&self, token: &str) -> Option<RawValue> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some(caps) = self.quoted.captures(token) {
            let inner = caps.name("dq").or_else(|| caps.name("sq"));
            return Some(RawValue::Text(inner.map_or("", |m| m.as_str()).to_string()));
        }
        if token == "null" || token == "~" {
            return None;
        }
        if token == "true" || token == "false" {
            return Some(RawValue::Bool(token == "true"));
        }
        if self.number.is_match(token) {
            if let Ok(n) = token.parse::<f64>() {
                return Some(RawValue::Number(n));
            }
        }
        Some(RawValue::Text(token.to_string()))
    }

    fn value(&self, token: &str) -> Option<RawValue> {
        match self.inline_list.captures(token) {
            Some(caps) => {
                let inner = caps.name("inner").map_or("", |m| m.as_str());
                let items = self
                    .list_token
                    .captures_iter(inner)
                    .filter_map(|item| self.scalar(item.name("item").map_or("", |m| m.as_str())))
                    .collect();
                Some(RawValue::List(items))
            }
            None => self.scalar(token),
        }
    }
}

/// Everything the patterns found, addressed by key path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    values: BTreeMap<Vec<String>, RawValue>,
    children: BTreeMap<Vec<String>, Vec<String>>,
}

impl FieldSource for Extraction {
    fn value(&self, path: &[&str]) -> Option<RawValue> {
        self.values.get(&owned(path)).cloned()
    }

    fn keys(&self, path: &[&str]) -> Vec<String> {
        self.children.get(&owned(path)).cloned().unwrap_or_default()
    }
}

fn owned(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

struct Open {
    indent: usize,
    path: Vec<String>,
    child_indent: Option<usize>,
    item_indent: Option<usize>,
}

/// Extract every field the text declares.
pub fn extract(patterns: &Patterns, text: &str) -> Result<Extraction, ExtractError> {
    let mut out = Extraction::default();
    let mut stack: Vec<Open> = vec![Open {
        indent: 0,
        path: Vec::new(),
        child_indent: Some(0),
        item_indent: None,
    }];

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let fail = |message: &str| ExtractError {
            line: line_no,
            message: message.to_string(),
        };
        let line = patterns.strip_comment(raw).trim_end();
        if line.trim().is_empty() || line.trim() == "---" {
            continue;
        }

        if let Some(caps) = patterns.item.captures(line) {
            let indent = caps.name("indent").map_or(0, |m| m.as_str().len());
            while stack.len() > 1 && stack.last().is_some_and(|o| o.indent > indent) {
                stack.pop();
            }
            let owner = match stack.last_mut() {
                Some(open) if !open.path.is_empty() && open.child_indent.is_none() => open,
                _ => return Err(fail("list item without an owning key")),
            };
            match owner.item_indent {
                Some(expected) if expected != indent => {
                    return Err(fail("inconsistent list indentation"))
                }
                Some(_) => {}
                None => owner.item_indent = Some(indent),
            }
            let items = match out
                .values
                .entry(owner.path.clone())
                .or_insert_with(|| RawValue::List(Vec::new()))
            {
                RawValue::List(items) => items,
                _ => return Err(fail("list item after a scalar value")),
            };
            let item = caps.name("item").map_or("", |m| m.as_str());
            items.extend(patterns.scalar(item));
            continue;
        }

        let (indent, raw_key, value) = patterns
            .entry(line)
            .ok_or_else(|| fail("line matches neither 'key: value' nor '- item'"))?;
        while stack.len() > 1 && stack.last().is_some_and(|o| o.indent >= indent) {
            stack.pop();
        }
        let parent = stack
            .last_mut()
            .ok_or_else(|| fail("no enclosing mapping"))?;
        if parent.item_indent.is_some() {
            return Err(fail("mapping key inside a list"));
        }
        match parent.child_indent {
            Some(expected) if expected != indent => return Err(fail("inconsistent indentation")),
            Some(_) => {}
            None if indent > parent.indent => parent.child_indent = Some(indent),
            None => return Err(fail("inconsistent indentation")),
        }

        let key = match patterns.quoted.captures(raw_key) {
            Some(q) => q.name("dq").or_else(|| q.name("sq")).map_or("", |m| m.as_str()),
            None => raw_key,
        }
        .to_string();
        if key.is_empty() {
            return Err(fail("empty key"));
        }
        let siblings = out.children.entry(parent.path.clone()).or_default();
        if siblings.contains(&key) {
            return Err(fail("duplicate key"));
        }
        siblings.push(key.clone());

        let mut path = parent.path.clone();
        path.push(key);
        if value.is_empty() {
            stack.push(Open {
                indent,
                path,
                child_indent: None,
                item_indent: None,
            });
        } else if let Some(value) = patterns.value(value) {
            out.values.insert(path, value);
        }
    }
    Ok(out)
}
