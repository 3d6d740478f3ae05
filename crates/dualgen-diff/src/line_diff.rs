//! Line-level comparison of two file contents.
//!
//! Uses the `similar` crate (Myers diff algorithm) to group changes into hunks
//! with context lines.

use similar::{ChangeTag, TextDiff};

use crate::model::{Excerpt, Location};

/// The result of diffing two texts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineDiff {
    pub hunks: Vec<DiffHunk>,
    pub left_lines: usize,
    pub right_lines: usize,
}

impl LineDiff {
    /// Lines present only on the right.
    pub fn additions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Lines present only on the left.
    pub fn deletions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }

    /// Where the first hunk starts on each side.
    pub fn first_location(&self) -> Option<Location> {
        let hunk = self.hunks.first()?;
        let mut left = hunk.left_start;
        let mut right = hunk.right_start;
        // Skip the leading context so the location points at the change.
        for line in &hunk.lines {
            match line {
                DiffLine::Context(_) => {
                    left += 1;
                    right += 1;
                }
                _ => break,
            }
        }
        Some(Location {
            left_line: left,
            right_line: right,
        })
    }

    /// Removed and added lines of the first hunk.
    pub fn first_excerpt(&self) -> Option<Excerpt> {
        let hunk = self.hunks.first()?;
        let mut before = Vec::new();
        let mut after = Vec::new();
        for line in &hunk.lines {
            match line {
                DiffLine::Removed(text) => before.push(text.as_str()),
                DiffLine::Added(text) => after.push(text.as_str()),
                DiffLine::Context(_) => {}
            }
        }
        Some(Excerpt {
            before: before.join("\n"),
            after: after.join("\n"),
        })
    }
}

/// A contiguous region of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    /// First left line in this hunk (1-based).
    pub left_start: usize,
    pub left_count: usize,
    /// First right line in this hunk (1-based).
    pub right_start: usize,
    pub right_count: usize,
    pub lines: Vec<DiffLine>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Compute a line-by-line diff with `context` lines around each change.
pub fn diff_lines(left: &str, right: &str, context: usize) -> LineDiff {
    let left_lines = left.lines().count();
    let right_lines = right.lines().count();
    if left == right {
        return LineDiff {
            hunks: Vec::new(),
            left_lines,
            right_lines,
        };
    }

    let text_diff = TextDiff::from_lines(left, right);
    let mut hunks = Vec::new();
    for group in text_diff.grouped_ops(context) {
        let (left_start, right_start) = match group.first() {
            Some(op) => (op.old_range().start + 1, op.new_range().start + 1),
            None => continue,
        };
        let mut hunk = DiffHunk {
            left_start,
            left_count: 0,
            right_start,
            right_count: 0,
            lines: Vec::new(),
        };
        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        hunk.lines.push(DiffLine::Context(text));
                        hunk.left_count += 1;
                        hunk.right_count += 1;
                    }
                    ChangeTag::Delete => {
                        hunk.lines.push(DiffLine::Removed(text));
                        hunk.left_count += 1;
                    }
                    ChangeTag::Insert => {
                        hunk.lines.push(DiffLine::Added(text));
                        hunk.right_count += 1;
                    }
                }
            }
        }
        hunks.push(hunk);
    }

    LineDiff {
        hunks,
        left_lines,
        right_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_no_diff() {
        let diff = diff_lines("a\nb\n", "a\nb\n", 3);
        assert!(diff.hunks.is_empty());
        assert_eq!(diff.left_lines, 2);
        assert!(diff.first_location().is_none());
    }

    #[test]
    fn modification_shows_remove_and_add() {
        let diff = diff_lines("hello world\n", "hello universe\n", 3);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
        let excerpt = diff.first_excerpt().unwrap();
        assert_eq!(excerpt.before, "hello world");
        assert_eq!(excerpt.after, "hello universe");
    }

    #[test]
    fn location_points_past_context() {
        let diff = diff_lines("a\nb\nc\nd\ne\n", "a\nb\nX\nd\ne\n", 3);
        assert_eq!(
            diff.first_location(),
            Some(Location {
                left_line: 3,
                right_line: 3
            })
        );
    }

    #[test]
    fn addition_at_end() {
        let diff = diff_lines("line1\n", "line1\nline2\n", 1);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
        assert_eq!(diff.right_lines, 2);
        assert_eq!(diff.first_excerpt().unwrap().after, "line2");
    }

    #[test]
    fn separate_hunks_without_context() {
        let left = "a\nb\nc\nd\ne\nf\ng\nh\n";
        let right = "X\nb\nc\nd\ne\nf\ng\nY\n";
        let diff = diff_lines(left, right, 0);
        assert_eq!(diff.hunks.len(), 2);
    }
}
