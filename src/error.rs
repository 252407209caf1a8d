//! Error types for the pdf-notes library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pdf-notes library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings (de)serialization error
    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Settings file could not be read or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// A setting holds a value the renderer cannot use
    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    /// Page size and margin do not leave a usable content area
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Note title cannot be turned into a file name
    #[error("Invalid note title: {0:?}")]
    InvalidTitle(String),

    /// Output file already exists
    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    pub(crate) fn invalid_setting(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidSetting { name, reason: reason.into() }
    }
}
