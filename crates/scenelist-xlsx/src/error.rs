//! Error types for XLSX I/O

use thiserror::Error;

/// Result type alias using [`XlsxError`]
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading or writing XLSX files
#[derive(Debug, Error)]
pub enum XlsxError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Value parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Not a valid XLSX archive
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Required archive part is missing
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// Document model error
    #[error(transparent)]
    Core(#[from] scenelist_core::Error),
}
