//! Per-call options and row bookkeeping types

use crate::error::RowError;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trellis_domain::term::is_valid_language_tag;
use trellis_domain::{RawValue, Row};

/// Options for one expansion call
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    /// Language tag applied to string literals of the named parameter
    pub language_tags: HashMap<String, String>,

    /// Columns whose values identify a row
    ///
    /// Rows agreeing on these columns, in both value and kind, share blank
    /// nodes. When empty, or when a key value is null or absent, the row's
    /// position is its identity.
    pub key_columns: Vec<String>,

    /// Checked before every row; set it to stop the run
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ExpandOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag string literals of `parameter` with `tag`
    pub fn with_language(mut self, parameter: impl Into<String>, tag: impl Into<String>) -> Self {
        self.language_tags.insert(parameter.into(), tag.into());
        self
    }

    /// Identify rows by these columns
    pub fn with_key_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a cancellation flag
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        for (parameter, tag) in &self.language_tags {
            if !is_valid_language_tag(tag) {
                return Err(format!("invalid language tag '{}' for parameter '{}'", tag, parameter));
            }
        }
        if self.key_columns.iter().any(String::is_empty) {
            return Err("key column names must not be empty".to_string());
        }
        Ok(())
    }

    /// Identity of a row under these options
    ///
    /// A row missing any key value is identified by `ordinal`, so rows with
    /// null keys never share blank nodes.
    pub fn identify(&self, ordinal: usize, row: &Row) -> RowIdentity {
        if self.key_columns.is_empty() {
            return RowIdentity::Ordinal(ordinal);
        }
        let mut parts = Vec::with_capacity(self.key_columns.len());
        for column in &self.key_columns {
            match row.get(column) {
                None | Some(RawValue::Null) => return RowIdentity::Ordinal(ordinal),
                Some(value) => parts.push(KeyPart {
                    column: column.clone(),
                    kind: value.kind(),
                    value: value.to_string(),
                }),
            }
        }
        RowIdentity::Key(parts)
    }
}

/// One key column's value within a [`RowIdentity`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPart {
    /// Column name
    pub column: String,
    /// Native kind of the value, as named by [`RawValue::kind`]
    pub kind: &'static str,
    /// Text form of the value
    pub value: String,
}

/// How a row is identified in blank-node keys and error reports
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowIdentity {
    /// Zero-based position in the row source
    Ordinal(usize),
    /// Values of the key columns, in key-column order
    Key(Vec<KeyPart>),
}

impl RowIdentity {
    /// Stable byte form used when hashing blank-node keys
    ///
    /// `base` offsets ordinal identities; key identities ignore it.
    pub(crate) fn key_bytes(&self, base: usize) -> Vec<u8> {
        match self {
            RowIdentity::Ordinal(ordinal) => format!("#{}", base + ordinal).into_bytes(),
            RowIdentity::Key(parts) => {
                let mut out = Vec::new();
                for part in parts {
                    out.extend_from_slice(part.column.as_bytes());
                    out.push(b'=');
                    out.extend_from_slice(part.kind.as_bytes());
                    out.push(b':');
                    out.extend_from_slice(part.value.as_bytes());
                    out.push(0x1e);
                }
                out
            }
        }
    }
}

impl fmt::Display for RowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIdentity::Ordinal(ordinal) => write!(f, "row {}", ordinal),
            RowIdentity::Key(parts) => {
                f.write_str("row [")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", part.column, part.value)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A row skipped in lenient mode
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Zero-based position in the row source
    pub ordinal: usize,
    /// Why the row was skipped
    pub error: RowError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.ordinal, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_by_ordinal() {
        let options = ExpandOptions::new();
        let row = Row::new().with("id", "x");
        assert_eq!(options.identify(7, &row), RowIdentity::Ordinal(7));
        assert_eq!(options.identify(7, &row).to_string(), "row 7");
    }

    #[test]
    fn test_identity_by_key_columns() {
        let options = ExpandOptions::new().with_key_columns(["id", "name"]);
        let row = Row::new().with("id", "p1").with("name", "Alice");

        let identity = options.identify(0, &row);
        assert_eq!(identity.to_string(), "row [id=p1, name=Alice]");
        assert_eq!(identity, options.identify(99, &row));
        assert_eq!(identity.key_bytes(0), identity.key_bytes(500));
    }

    #[test]
    fn test_key_identity_keeps_value_kind() {
        let options = ExpandOptions::new().with_key_columns(["k"]);
        let text = options.identify(0, &Row::new().with("k", "1"));
        let number = options.identify(0, &Row::new().with("k", 1i64));

        assert_ne!(text, number);
        assert_ne!(text.key_bytes(0), number.key_bytes(0));
        assert_eq!(text.to_string(), number.to_string());
    }

    #[test]
    fn test_null_or_absent_key_falls_back_to_ordinal() {
        let options = ExpandOptions::new().with_key_columns(["k"]);
        let word = options.identify(0, &Row::new().with("k", "null"));
        let null = options.identify(1, &Row::new().with("k", RawValue::Null));
        let absent = options.identify(2, &Row::new().with("other", "x"));

        assert!(matches!(word, RowIdentity::Key(_)));
        assert_eq!(null, RowIdentity::Ordinal(1));
        assert_eq!(absent, RowIdentity::Ordinal(2));
        assert_ne!(word.key_bytes(0), null.key_bytes(0));
        assert_ne!(null.key_bytes(0), absent.key_bytes(0));
    }

    #[test]
    fn test_ordinal_key_bytes_are_offset_by_base() {
        let first = RowIdentity::Ordinal(0);
        assert_eq!(first.key_bytes(3), RowIdentity::Ordinal(3).key_bytes(0));
        assert_ne!(first.key_bytes(0), first.key_bytes(1));
    }

    #[test]
    fn test_invalid_language_tag() {
        let options = ExpandOptions::new().with_language("name", "not a tag");
        assert!(options.validate().is_err());
        assert!(ExpandOptions::new().with_language("name", "en-GB").validate().is_ok());
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let options = ExpandOptions::new().with_cancel(flag.clone());
        assert!(!options.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(options.is_cancelled());
    }
}
