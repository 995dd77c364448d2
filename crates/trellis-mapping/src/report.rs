//! Report of one expansion call

use crate::types::RowFailure;
use chrono::{DateTime, Utc};

/// Counts and failures collected while expanding one template over a row source
///
/// In lenient mode `failures` lists every skipped row with the reason, so a
/// run can be reproduced from the report alone.
#[derive(Debug, Clone)]
pub struct ExpansionReport {
    /// Template that was expanded
    pub template: String,

    /// Rows expanded without error
    pub rows_processed: usize,

    /// Rows skipped because of a row error (lenient mode only)
    pub rows_skipped: usize,

    /// Triples produced, duplicates included
    pub triples_emitted: usize,

    /// Triples that were new to the mapping's graph
    pub triples_inserted: usize,

    /// Every skipped row with its error
    pub failures: Vec<RowFailure>,

    /// When the expansion started
    pub started_at: DateTime<Utc>,

    /// Wall-clock time in milliseconds
    pub elapsed_ms: u64,
}

impl ExpansionReport {
    /// Create an empty report for a template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            rows_processed: 0,
            rows_skipped: 0,
            triples_emitted: 0,
            triples_inserted: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            elapsed_ms: 0,
        }
    }

    /// Record a successfully expanded row
    pub fn record_row(&mut self, triples: usize) {
        self.rows_processed += 1;
        self.triples_emitted += triples;
    }

    /// Record a skipped row
    pub fn record_failure(&mut self, failure: RowFailure) {
        self.rows_skipped += 1;
        self.failures.push(failure);
    }

    /// Total rows pulled from the source
    pub fn rows_seen(&self) -> usize {
        self.rows_processed + self.rows_skipped
    }

    /// Whether every row expanded cleanly
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Expansion of {}", self.template),
            format!("Started: {}", self.started_at.to_rfc3339()),
            format!("Rows processed: {}", self.rows_processed),
            format!("Rows skipped: {}", self.rows_skipped),
            format!("Triples emitted: {}", self.triples_emitted),
            format!("Triples inserted: {}", self.triples_inserted),
            format!("Elapsed: {}ms", self.elapsed_ms),
        ];

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failures:".to_string());
            for failure in &self.failures {
                lines.push(format!("  {}", failure));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use crate::types::RowIdentity;

    #[test]
    fn test_report_creation() {
        let report = ExpansionReport::new("http://example.org/Person");
        assert_eq!(report.rows_seen(), 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_record_rows_and_failures() {
        let mut report = ExpansionReport::new("http://example.org/Person");
        report.record_row(2);
        report.record_row(3);
        report.record_failure(RowFailure {
            ordinal: 2,
            error: RowError::MissingRequiredValue {
                parameter: "name".into(),
                row: RowIdentity::Ordinal(2),
            },
        });

        assert_eq!(report.rows_processed, 2);
        assert_eq!(report.triples_emitted, 5);
        assert_eq!(report.rows_seen(), 3);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_summary_lists_failures() {
        let mut report = ExpansionReport::new("http://example.org/Person");
        report.record_failure(RowFailure {
            ordinal: 4,
            error: RowError::MissingRequiredValue {
                parameter: "id".into(),
                row: RowIdentity::Ordinal(4),
            },
        });

        let summary = report.summary();
        assert!(summary.contains("Rows skipped: 1"));
        assert!(summary.contains("parameter 'id' at row 4"));
    }
}
