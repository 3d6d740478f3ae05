//! Top-level exported declaration names.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::DiffResult;

/// Matches `export const|let|var|function|type|interface|class|enum NAME`
/// at the start of a line.
pub struct ExportScanner {
    pattern: Regex,
}

impl ExportScanner {
    pub fn new() -> DiffResult<Self> {
        Ok(Self {
            pattern: Regex::new(
                r"(?m)^export\s+(?:declare\s+)?(?:default\s+)?(?:async\s+)?(?:const|let|var|function\*?|type|interface|class|enum)\s+([A-Za-z_$][A-Za-z0-9_$]*)",
            )?,
        })
    }

    /// Exported names in `source`, sorted.
    pub fn names(&self, source: &str) -> BTreeSet<String> {
        self.pattern
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
