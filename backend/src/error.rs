//! Error types for the Dineview exploration pipeline.
//!
//! This module defines the error hierarchy used across layers:
//!
//! - [`LoadError`] - Reading and decoding the source table
//! - [`SelectionError`] - A selection that names values absent from the data
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP boundary errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading the raw listing table.
///
/// All of these are fatal to a session: there is no recovery path for a
/// structurally invalid source table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the file content.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Malformed CSV record.
    #[error("Invalid CSV at line {line}: {message}")]
    Csv { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A required column is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |p| p.line());
        LoadError::Csv {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Selection Errors
// =============================================================================

/// A selection value that is not offered by the current data.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    /// Location not present in the table.
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// Cuisine not offered for the chosen location.
    #[error("Unknown cuisine '{cuisine}' for location '{location}'")]
    UnknownCuisine { location: String, cuisine: String },

    /// Restaurant not offered for the chosen location and cuisine.
    #[error("Unknown restaurant: {0}")]
    UnknownRestaurant(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Selection error.
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ServerError {
    /// Wrap a pipeline failure; selection failures become `BadRequest`.
    pub fn from_pipeline(err: PipelineError) -> Self {
        match err {
            PipelineError::Selection(e) => ServerError::BadRequest(e.to_string()),
            other => ServerError::Pipeline(other),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for selection checks.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // LoadError -> PipelineError
        let load_err = LoadError::EmptyFile;
        let pipeline_err: PipelineError = load_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // SelectionError -> PipelineError -> ServerError
        let sel_err = SelectionError::UnknownLocation("Adyar".into());
        let pipeline_err: PipelineError = sel_err.into();
        let server_err: ServerError = pipeline_err.into();
        assert!(server_err.to_string().contains("Adyar"));
    }

    #[test]
    fn test_selection_failure_is_bad_request() {
        let sel_err = SelectionError::UnknownRestaurant("X".into());
        let err = ServerError::from_pipeline(sel_err.into());
        assert!(matches!(err, ServerError::BadRequest(ref m) if m == "Unknown restaurant: X"));

        let err = ServerError::from_pipeline(LoadError::EmptyFile.into());
        assert!(matches!(err, ServerError::Pipeline(PipelineError::Load(_))));
    }

    #[test]
    fn test_missing_column_format() {
        let err = LoadError::MissingColumn("Top Dishes".into());
        assert_eq!(err.to_string(), "Missing required column: Top Dishes");
    }

    #[test]
    fn test_unknown_cuisine_format() {
        let err = SelectionError::UnknownCuisine {
            location: "Adyar".into(),
            cuisine: "Thai".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Adyar"));
        assert!(msg.contains("Thai"));
    }
}
