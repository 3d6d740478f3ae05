use tracing::{debug, info, warn};

use dualgen_diff::{
    compare_file_sets, compare_metadata, diff_lines, DiffType, ExportScanner, Mismatch, Severity,
};
use dualgen_types::{GeneratedFile, GenerationBundle};

use crate::classify::classify;
use crate::error::{AdjudicationError, AdjudicationFault, AdjudicationResult};
use crate::ladder::{reconcile, Reconciled};
use crate::lexer::{tokenize, tokens, Lexeme};
use crate::normalize::normalize;
use crate::options::ComparisonOptions;
use crate::verdict::Verdict;

/// Compares two bundles under a fixed set of options.
#[derive(Clone, Debug, Default)]
pub struct Adjudicator {
    options: ComparisonOptions,
}

impl Adjudicator {
    pub fn new(options: ComparisonOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    /// Adjudicate `left` against `right`.
    ///
    /// A missing bundle is an error. Any fault during the comparison itself
    /// yields an `ERROR` verdict.
    pub fn adjudicate(
        &self,
        left: Option<&GenerationBundle>,
        right: Option<&GenerationBundle>,
    ) -> AdjudicationResult<Verdict> {
        let left =
            left.ok_or_else(|| AdjudicationError::InvalidInput("left bundle is missing".into()))?;
        let right =
            right.ok_or_else(|| AdjudicationError::InvalidInput("right bundle is missing".into()))?;

        let mut diffs = Vec::new();
        let verdict = match self.compare(left, right, &mut diffs) {
            Ok(()) => Verdict::from_diffs(diffs),
            Err(fault) => {
                warn!(error = %fault, "adjudication fault");
                Verdict::error(fault.to_string(), diffs)
            }
        };
        info!(
            left = %left.metadata.generator,
            right = %right.metadata.generator,
            verdict = %verdict.verdict,
            confidence = verdict.confidence,
            diffs = verdict.diffs.len(),
            "adjudicated"
        );
        Ok(verdict)
    }

    fn compare(
        &self,
        left: &GenerationBundle,
        right: &GenerationBundle,
        diffs: &mut Vec<Mismatch>,
    ) -> Result<(), AdjudicationFault> {
        let scanner = ExportScanner::new()?;
        diffs.extend(compare_file_sets(left, right));
        for file in &left.files {
            if let Some(other) = right.file(&file.path) {
                if let Some(diff) = self.compare_file(&scanner, file, other)? {
                    diffs.push(diff);
                }
            }
        }
        diffs.extend(compare_metadata(left, right));
        Ok(())
    }

    fn compare_file(
        &self,
        scanner: &ExportScanner,
        left: &GeneratedFile,
        right: &GeneratedFile,
    ) -> Result<Option<Mismatch>, AdjudicationFault> {
        if left.hash == right.hash {
            return Ok(None);
        }
        let left_lexemes = lex(left, "left")?;
        let right_lexemes = lex(right, "right")?;
        if normalize(&left.content, &left_lexemes, &self.options)
            == normalize(&right.content, &right_lexemes, &self.options)
        {
            debug!(path = %left.path, "equal after normalization");
            return Ok(None);
        }

        let (diff_type, severity, description) = match reconcile(
            tokens(&left_lexemes),
            tokens(&right_lexemes),
            self.options.mode,
        ) {
            Reconciled::At(rung) => (
                DiffType::EquivalentVariant,
                Severity::Minor,
                format!("equivalent after normalizing {rung}"),
            ),
            Reconciled::No {
                left: left_tokens,
                right: right_tokens,
            } => {
                let (diff_type, description) = classify(
                    scanner,
                    &left.content,
                    &right.content,
                    &left_tokens,
                    &right_tokens,
                );
                (diff_type, Severity::Major, description)
            }
        };
        debug!(path = %left.path, %diff_type, "file classified");

        let lines = diff_lines(&left.content, &right.content, 0);
        let limit = self.options.max_diff_size;
        Ok(Some(
            Mismatch::new(Some(left.path.as_str()), diff_type, severity, description)
                .with_excerpt(lines.first_excerpt().map(|e| e.truncated(limit)))
                .with_location(lines.first_location()),
        ))
    }
}

fn lex(file: &GeneratedFile, side: &'static str) -> Result<Vec<Lexeme>, AdjudicationFault> {
    tokenize(&file.content).map_err(|source| AdjudicationFault::Lex {
        path: file.path.clone(),
        side,
        source,
    })
}
