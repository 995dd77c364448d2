//! Error types for the CLI application.

use thiserror::Error;
use trellis_mapping::MappingError;
use trellis_store::NTriplesError;
use trellis_templates::TemplateError;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template registration, validation or resolution failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Expansion failed
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// N-Triples input could not be read
    #[error(transparent)]
    NTriples(#[from] NTriplesError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
