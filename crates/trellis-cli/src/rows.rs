//! JSON-lines row input
//!
//! Each non-blank line is one JSON object mapping column names to values.
//! Strings that parse as RFC 3339 timestamps become datetime values unless
//! [`RowOptions::keep_strings`] is set. Arrays become list values and nested
//! objects are rejected.

use crate::error::{CliError, Result};
use chrono::DateTime;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use trellis_domain::{RawValue, Row};

/// How JSON values are turned into raw row values
#[derive(Debug, Clone, Copy, Default)]
pub struct RowOptions {
    /// Leave timestamp-shaped strings as text
    pub keep_strings: bool,
}

/// Read every row of a JSON-lines file
pub fn load_rows(path: impl AsRef<Path>, options: RowOptions) -> Result<Vec<Row>> {
    let file = File::open(path)?;
    read_json_lines(BufReader::new(file), options)
}

/// Read rows from a JSON-lines stream
pub fn read_json_lines<R: BufRead>(reader: R, options: RowOptions) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(&line, index + 1, options)?);
    }
    Ok(rows)
}

/// Parse one line into a row
pub fn parse_row(line: &str, line_number: usize, options: RowOptions) -> Result<Row> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| CliError::InvalidInput(format!("line {}: {}", line_number, e)))?;

    let Value::Object(fields) = value else {
        return Err(CliError::InvalidInput(format!(
            "line {}: expected a JSON object",
            line_number
        )));
    };

    let mut row = Row::new();
    for (column, value) in fields {
        let raw = to_raw(value, options).map_err(|reason| {
            CliError::InvalidInput(format!("line {}, column '{}': {}", line_number, column, reason))
        })?;
        row.insert(column, raw);
    }
    Ok(row)
}

fn to_raw(value: Value, options: RowOptions) -> std::result::Result<RawValue, String> {
    match value {
        Value::Null => Ok(RawValue::Null),
        Value::Bool(b) => Ok(RawValue::Boolean(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(RawValue::Integer(i)),
            None => n
                .as_f64()
                .map(RawValue::Float)
                .ok_or_else(|| format!("number {} out of range", n)),
        },
        Value::String(s) if options.keep_strings => Ok(RawValue::String(s)),
        Value::String(s) => Ok(match DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => RawValue::DateTime(dt),
            Err(_) => RawValue::String(s),
        }),
        Value::Array(items) => items
            .into_iter()
            .map(|item| to_raw(item, options))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(RawValue::List),
        Value::Object(_) => Err("nested objects are not supported".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        let row = parse_row(
            r#"{"id": "http://example.org/p1", "age": 42, "score": 0.5, "active": true, "nick": null}"#,
            1,
            RowOptions::default(),
        )
        .unwrap();

        assert_eq!(row.get("id"), Some(&RawValue::from("http://example.org/p1")));
        assert_eq!(row.get("age"), Some(&RawValue::Integer(42)));
        assert_eq!(row.get("score"), Some(&RawValue::Float(0.5)));
        assert_eq!(row.get("active"), Some(&RawValue::Boolean(true)));
        assert_eq!(row.get("nick"), Some(&RawValue::Null));
    }

    #[test]
    fn test_timestamps_and_lists() {
        let line = r#"{"seen": "2024-03-01T12:00:00+01:00", "tags": ["a", "b"]}"#;
        let row = parse_row(line, 1, RowOptions::default()).unwrap();

        assert_eq!(row.get("seen").unwrap().kind(), "datetime");
        assert_eq!(row.get("tags"), Some(&RawValue::from(vec!["a", "b"])));
    }

    #[test]
    fn test_keep_strings_leaves_timestamps_as_text() {
        let line = r#"{"seen": "2024-03-01T12:00:00+01:00", "log": ["2024-03-02T08:00:00Z"]}"#;
        let row = parse_row(line, 1, RowOptions { keep_strings: true }).unwrap();

        assert_eq!(row.get("seen"), Some(&RawValue::from("2024-03-01T12:00:00+01:00")));
        assert_eq!(row.get("log"), Some(&RawValue::from(vec!["2024-03-02T08:00:00Z"])));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "{\"id\": 1}\n\n   \n{\"id\": 2}\n";
        let rows = read_json_lines(input.as_bytes(), RowOptions::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("id"), Some(&RawValue::Integer(2)));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let input = "{\"id\": 1}\n[1, 2]\n";
        match read_json_lines(input.as_bytes(), RowOptions::default()) {
            Err(CliError::InvalidInput(message)) => assert!(message.starts_with("line 2")),
            other => panic!("expected invalid input, got {:?}", other),
        }

        match parse_row(r#"{"address": {"city": "Oslo"}}"#, 7, RowOptions::default()) {
            Err(CliError::InvalidInput(message)) => {
                assert!(message.contains("line 7"));
                assert!(message.contains("address"));
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }
}
