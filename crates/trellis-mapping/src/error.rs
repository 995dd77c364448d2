//! Error types for mapping runs

use crate::types::RowIdentity;
use thiserror::Error;
use trellis_store::NTriplesError;
use trellis_templates::TemplateError;

/// Errors raised while expanding one row
///
/// In fail-fast mode the first one aborts the run as [`MappingError::Row`];
/// in lenient mode each is recorded against its row in the report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    /// A raw value cannot satisfy the declared parameter type
    #[error("Type coercion failed for parameter '{parameter}' ({declared}) at {row}: {reason}")]
    TypeCoercion {
        /// Parameter name
        parameter: String,
        /// Offending row
        row: RowIdentity,
        /// Declared parameter type
        declared: String,
        /// What is wrong with the value
        reason: String,
    },

    /// A required parameter is bound to a null or absent value
    #[error("Missing required value for parameter '{parameter}' at {row}")]
    MissingRequiredValue {
        /// Parameter name
        parameter: String,
        /// Offending row
        row: RowIdentity,
    },

    /// The bound terms do not form a triple (literal subject, non-IRI predicate)
    #[error("Illegal triple at {row}: {reason}")]
    IllegalTriple {
        /// Offending row
        row: RowIdentity,
        /// Why the terms are not a triple
        reason: String,
    },
}

impl RowError {
    /// Identity of the row that failed
    pub fn row(&self) -> &RowIdentity {
        match self {
            RowError::TypeCoercion { row, .. }
            | RowError::MissingRequiredValue { row, .. }
            | RowError::IllegalTriple { row, .. } => row,
        }
    }
}

/// Errors that can occur during a mapping run
#[derive(Error, Debug)]
pub enum MappingError {
    /// Registration, validation or resolution failed
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// A row failed in fail-fast mode
    #[error("Row error: {0}")]
    Row(#[from] RowError),

    /// Invalid configuration or options
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input that cannot drive expansion at all
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The run was cancelled before its last row
    #[error("Cancelled after {rows_processed} row(s)")]
    Cancelled {
        /// Rows fully expanded before cancellation
        rows_processed: usize,
    },

    /// Thread pool construction failed
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] NTriplesError),
}

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;
