//! Node-to-text serialization.
//!
//! Strings are written as JSON string literals (double quotes). Multi-line
//! objects and arrays end every element with a comma.

use std::fmt::Write;

use crate::error::TreeResult;
use crate::node::{Expr, Module, Node, Param, Stmt, Value};

const INDENT: &str = "  ";

/// Serialize a module to text.
pub fn serialize(module: &Module) -> TreeResult<String> {
    let mut out = String::new();
    writeln!(out, "/**")?;
    for line in &module.header {
        writeln!(out, " * {line}")?;
    }
    writeln!(out, " */")?;

    let mut previous: Option<&Node> = None;
    for node in &module.nodes {
        let grouped = matches!(
            (previous, node),
            (Some(Node::Import { .. }), Node::Import { .. })
                | (Some(Node::Export { .. }), Node::Export { .. })
        );
        if !grouped {
            writeln!(out)?;
        }
        write_node(&mut out, node)?;
        previous = Some(node);
    }
    Ok(out)
}

fn write_node(out: &mut String, node: &Node) -> TreeResult<()> {
    match node {
        Node::Import {
            names,
            from,
            type_only,
        } => {
            let keyword = if *type_only { "import type" } else { "import" };
            writeln!(
                out,
                "{keyword} {{ {} }} from {};",
                names.join(", "),
                string(from)?
            )?;
        }
        Node::TypeAlias { name, members } => {
            let union = if members.is_empty() {
                "never".to_string()
            } else {
                members
                    .iter()
                    .map(|m| string(m))
                    .collect::<TreeResult<Vec<_>>>()?
                    .join(" | ")
            };
            writeln!(out, "export type {name} = {union};")?;
        }
        Node::Interface { name, members } => {
            writeln!(out, "export interface {name} {{")?;
            for (member, ty) in members {
                writeln!(out, "{INDENT}readonly {member}: {ty};")?;
            }
            writeln!(out, "}}")?;
        }
        Node::Constant { name, ty, value } => {
            let annotation = ty.as_ref().map(|t| format!(": {t}")).unwrap_or_default();
            writeln!(out, "export const {name}{annotation} = {};", expr(value, 0)?)?;
        }
        Node::Function {
            name,
            params,
            returns,
            body,
        } => {
            let params: Vec<String> = params.iter().map(param).collect();
            writeln!(
                out,
                "export function {name}({}): {returns} {{",
                params.join(", ")
            )?;
            for stmt in body {
                write_stmt(out, stmt, 1)?;
            }
            writeln!(out, "}}")?;
        }
        Node::Export { from } => {
            writeln!(out, "export * from {};", string(from)?)?;
        }
    }
    Ok(())
}

fn param(p: &Param) -> String {
    match &p.default {
        Some(default) => format!("{}: {} = {default}", p.name, p.ty),
        None => format!("{}: {}", p.name, p.ty),
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) -> TreeResult<()> {
    let pad = INDENT.repeat(depth);
    match stmt {
        Stmt::Return(value) => writeln!(out, "{pad}return {};", expr(value, depth)?)?,
        Stmt::Const { name, value } => {
            writeln!(out, "{pad}const {name} = {};", expr(value, depth)?)?
        }
        Stmt::If { condition, then } => {
            writeln!(out, "{pad}if ({condition}) {{")?;
            for inner in then {
                write_stmt(out, inner, depth + 1)?;
            }
            writeln!(out, "{pad}}}")?;
        }
        Stmt::Switch { subject, cases } => {
            writeln!(out, "{pad}switch ({subject}) {{")?;
            for (label, body) in cases {
                writeln!(out, "{pad}{INDENT}case {}:", value(label, depth + 1)?)?;
                for inner in body {
                    write_stmt(out, inner, depth + 2)?;
                }
            }
            writeln!(out, "{pad}}}")?;
        }
    }
    Ok(())
}

fn expr(e: &Expr, depth: usize) -> TreeResult<String> {
    match e {
        Expr::Value(v) => value(v, depth),
        Expr::Code(code) => Ok(code.clone()),
    }
}

fn string(text: &str) -> TreeResult<String> {
    Ok(serde_json::to_string(text)?)
}

fn is_scalar(v: &Value) -> bool {
    !matches!(v, Value::Array(_) | Value::Object(_))
}

/// Render a value whose first line is already positioned at `depth`.
fn value(v: &Value, depth: usize) -> TreeResult<String> {
    let close = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);
    Ok(match v {
        Value::Str(s) => string(s)?,
        Value::Num(n) => format!("{n}"),
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Ref(name) => name.clone(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) if items.iter().all(is_scalar) => {
            let parts = items
                .iter()
                .map(|item| value(item, depth))
                .collect::<TreeResult<Vec<_>>>()?;
            format!("[{}]", parts.join(", "))
        }
        Value::Array(items) => {
            let mut text = String::from("[\n");
            for item in items {
                writeln!(text, "{inner}{},", value(item, depth + 1)?)?;
            }
            text.push_str(&close);
            text.push(']');
            text
        }
        Value::Object(entries) if entries.is_empty() => "{}".to_string(),
        Value::Object(entries) => {
            let mut text = String::from("{\n");
            for (key, item) in entries {
                writeln!(text, "{inner}{key}: {},", value(item, depth + 1)?)?;
            }
            text.push_str(&close);
            text.push('}');
            text
        }
    })
}
