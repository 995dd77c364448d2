//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use trellis_domain::Triple;
use trellis_mapping::ExpansionReport;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format query results.
    pub fn format_triples(&self, triples: &[Triple]) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_triples_json(triples),
            CliFormat::Table => self.format_triples_table(triples),
            CliFormat::NTriples => Ok(triples
                .iter()
                .map(Triple::to_string)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_triples_json(&self, triples: &[Triple]) -> Result<String> {
        let json_triples: Vec<serde_json::Value> = triples
            .iter()
            .map(|t| {
                serde_json::json!({
                    "subject": t.subject().to_string(),
                    "predicate": t.predicate().to_string(),
                    "object": t.object().to_string(),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_triples)?)
    }

    fn format_triples_table(&self, triples: &[Triple]) -> Result<String> {
        if triples.is_empty() {
            return Ok(self.colorize("No triples found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Subject", "Predicate", "Object"]);
        for triple in triples {
            builder.push_record([
                triple.subject().to_string(),
                triple.predicate().to_string(),
                triple.object().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format an expansion report.
    pub fn format_report(&self, report: &ExpansionReport) -> Result<String> {
        match self.format {
            CliFormat::Json => {
                let failures: Vec<serde_json::Value> = report
                    .failures
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "ordinal": f.ordinal,
                            "row": f.error.row().to_string(),
                            "error": f.error.to_string(),
                        })
                    })
                    .collect();

                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "template": report.template,
                    "rows_processed": report.rows_processed,
                    "rows_skipped": report.rows_skipped,
                    "triples_emitted": report.triples_emitted,
                    "triples_inserted": report.triples_inserted,
                    "started_at": report.started_at.to_rfc3339(),
                    "elapsed_ms": report.elapsed_ms,
                    "failures": failures,
                }))?)
            }
            CliFormat::Table => Ok(self.format_report_table(report)),
            CliFormat::NTriples => Ok(report.summary()),
        }
    }

    fn format_report_table(&self, report: &ExpansionReport) -> String {
        let records = [
            ("Template", report.template.clone()),
            ("Rows processed", report.rows_processed.to_string()),
            ("Rows skipped", report.rows_skipped.to_string()),
            ("Triples emitted", report.triples_emitted.to_string()),
            ("Triples inserted", report.triples_inserted.to_string()),
            ("Elapsed", format!("{}ms", report.elapsed_ms)),
        ];

        let mut builder = Builder::default();
        for (label, value) in records {
            builder.push_record([label.to_string(), value]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        let mut lines = vec![table.to_string()];
        for failure in &report.failures {
            lines.push(self.warning(&failure.to_string()));
        }
        lines.join("\n")
    }

    /// Format a list of template names.
    pub fn format_names(&self, names: &[String]) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(names)?),
            _ => Ok(names.join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_domain::{Literal, Term};
    use trellis_mapping::{RowError, RowFailure, RowIdentity};

    fn sample() -> Vec<Triple> {
        vec![Triple::new(
            Term::iri("http://example.org/p1").unwrap(),
            Term::iri("http://xmlns.com/foaf/0.1/name").unwrap(),
            Term::Literal(Literal::string("Alice")),
        )
        .unwrap()]
    }

    #[test]
    fn test_ntriples_format() {
        let formatter = Formatter::new(CliFormat::NTriples, false);
        let output = formatter.format_triples(&sample()).unwrap();
        assert_eq!(
            output,
            "<http://example.org/p1> <http://xmlns.com/foaf/0.1/name> \"Alice\" ."
        );
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let output = formatter.format_triples(&sample()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["subject"], "<http://example.org/p1>");
        assert_eq!(parsed[0]["object"], "\"Alice\"");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_triples(&sample()).unwrap();
        assert!(output.contains("Subject"));
        assert!(output.contains("<http://example.org/p1>"));

        assert_eq!(formatter.format_triples(&[]).unwrap(), "No triples found.");
    }

    #[test]
    fn test_report_lists_failures() {
        let mut report = ExpansionReport::new("http://example.org/Person");
        report.record_row(2);
        report.record_failure(RowFailure {
            ordinal: 1,
            error: RowError::MissingRequiredValue {
                parameter: "name".into(),
                row: RowIdentity::Ordinal(1),
            },
        });

        let table = Formatter::new(CliFormat::Table, false).format_report(&report).unwrap();
        assert!(table.contains("Rows skipped"));
        assert!(table.contains("⚠"));

        let json = Formatter::new(CliFormat::Json, false).format_report(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["rows_skipped"], 1);
        assert_eq!(parsed["failures"][0]["row"], "row 1");
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(CliFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
