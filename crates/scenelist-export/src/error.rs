//! Error types for the export pipeline

use thiserror::Error;

/// Result type alias using [`ExportError`]
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while building a scene-list spreadsheet
#[derive(Debug, Error)]
pub enum ExportError {
    /// The template could not be read, or the output could not be written
    #[error("Template error: {0}")]
    Template(#[from] scenelist_xlsx::XlsxError),

    /// A required anchor cell is missing from the template
    #[error("Anchor not found: {0}")]
    AnchorNotFound(String),

    /// Document model error
    #[error(transparent)]
    Core(#[from] scenelist_core::Error),

    /// The analysis service response was not usable
    #[error("Analysis response error: {0}")]
    Analysis(String),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
