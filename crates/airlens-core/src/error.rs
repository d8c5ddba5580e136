//! Error types for Airlens
//!
//! Errors that reach the user carry actionable messages: what went wrong
//! and what to check or change before retrying.

use thiserror::Error;

/// Result type alias for Airlens operations
pub type Result<T> = std::result::Result<T, AirlensError>;

/// Main error type for Airlens
#[derive(Error, Debug)]
pub enum AirlensError {
    /// Input could not be read as CSV at all
    #[error("Failed to parse dataset: {0}. Ensure the input is a well-formed CSV file.")]
    Parse(String),

    /// A column the chart battery depends on is absent from the header row
    #[error("Dataset is missing required column '{column}'. Re-export the passenger data with the standard column set.")]
    MissingColumn { column: String },

    /// Required input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// Unique constraint hit while registering a user
    #[error("A user with this {field} already exists. Pick a different {field} and try again.")]
    DuplicateCredential { field: String },

    /// Credential database operation failed (rusqlite)
    #[error("Credential database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Chart rendering or encoding failed
    #[error("Failed to render chart '{chart}': {message}")]
    Render { chart: String, message: String },

    /// Background rendering task aborted before completing
    #[error("Chart generation task failed: {0}")]
    Task(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables.")]
    Config(String),
}

impl AirlensError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a missing-column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a duplicate-credential error for the named unique field
    pub fn duplicate(field: impl Into<String>) -> Self {
        Self::DuplicateCredential {
            field: field.into(),
        }
    }

    /// Create a render error for the named chart
    pub fn render(chart: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            chart: chart.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<csv::Error> for AirlensError {
    fn from(err: csv::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
