//! Error types for pdfoutline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::rank::EmbedderError;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting outlines or ranking sections.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input directory is missing or cannot be listed.
    #[error("Input directory {path} is not readable: {reason}")]
    InputDirectory { path: PathBuf, reason: String },

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// A page's content stream could not be read.
    #[error("Page {page}: {reason}")]
    UnreadablePage { page: u32, reason: String },

    /// The embedding provider failed.
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbedderError),

    /// Error during JSON rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnreadablePage {
            page: 3,
            reason: "bad stream".to_string(),
        };
        assert_eq!(err.to_string(), "Page 3: bad stream");
    }

    #[test]
    fn test_input_directory_display() {
        let err = Error::InputDirectory {
            path: PathBuf::from("missing"),
            reason: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Input directory missing is not readable: not found"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_embedder_error_conversion() {
        let err: Error = EmbedderError::InvalidConfiguration {
            message: "dimension must be greater than zero".into(),
        }
        .into();
        assert!(matches!(err, Error::Embedding(_)));
    }
}
