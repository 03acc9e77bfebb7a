//! Error types for the label-layout library

use thiserror::Error;

/// Result type alias using LabelError
pub type Result<T> = std::result::Result<T, LabelError>;

/// Errors that can occur when laying out or exporting a label
#[derive(Debug, Error)]
pub enum LabelError {
    /// Error from the underlying lopdf library
    #[error("PDF operation failed: {0}")]
    PdfError(#[from] lopdf::Error),

    /// The text measurement backend failed for a request
    #[error("Text measurement failed: {0}")]
    Measurement(String),

    /// No text measurement backend is available
    #[error("Text measurement unavailable: {0}")]
    MeasurementUnavailable(String),

    /// Font data could not be loaded
    #[error("Font loading failed: {0}")]
    FontError(String),

    /// A configuration value was rejected
    #[error("Invalid label configuration: {0}")]
    InvalidConfig(String),

    /// A custom icon image could not be embedded
    #[error("Icon image could not be embedded: {0}")]
    ImageError(String),
}
