//! Error types for Durchsicht.
//!
//! All fallible library operations return [`Result`], whose error type is
//! [`DurchsichtError`]. The taxonomy follows two rules:
//!
//! - **System errors bubble up unchanged:** `DurchsichtError::Io` wraps
//!   `std::io::Error` verbatim so callers can act on the underlying kind.
//! - **Pipeline errors carry their stage and page:** rendering and
//!   recognition failures name the 1-based page they occurred on, because
//!   the whole-document atomicity policy aborts the assembly and the caller
//!   needs to know where.
//!
//! Low recognition confidence is deliberately *not* an error. It is reported
//! through the advisory sidecar on [`crate::types::ReconstructionReport`].
use thiserror::Error;

/// Result type alias using `DurchsichtError`.
pub type Result<T> = std::result::Result<T, DurchsichtError>;

/// Main error type for all Durchsicht operations.
#[derive(Debug, Error)]
pub enum DurchsichtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source bytes cannot be parsed as a PDF document at all.
    #[error("Invalid document: {message}")]
    InvalidDocument {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The payload is not a document this pipeline accepts. Rejected before
    /// any processing begins.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Rasterization of a specific page failed. Fatal to the whole assembly.
    #[error("Rendering failed on page {page}: {message}")]
    PageRender {
        page: usize,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text recognition failed on a specific page. Fatal to the whole assembly.
    #[error("Recognition failed on page {page}: {message}")]
    Recognition {
        page: usize,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Writing the output document failed.
    #[error("Synthesis failed: {message}")]
    Synthesis {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller-initiated cancellation, observed before the named page started.
    #[error("Reconstruction cancelled before page {page}")]
    Cancelled { page: usize },
}

impl DurchsichtError {
    /// Create an InvalidDocument error.
    pub fn invalid_document<S: Into<String>>(message: S) -> Self {
        Self::InvalidDocument {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a page rendering failure with its 1-based page number.
    pub fn page_render<E>(page: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::PageRender {
            page,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a recognition failure with its 1-based page number.
    pub fn recognition<E>(page: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Recognition {
            page,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap an output-document write failure.
    pub fn synthesis<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Synthesis {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<crate::pdf::error::PdfError> for DurchsichtError {
    fn from(err: crate::pdf::error::PdfError) -> Self {
        DurchsichtError::InvalidDocument {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
