//! Durchsicht - Searchable-PDF Reconstruction for Scanned Documents
//!
//! Durchsicht rebuilds an editable, searchable document from an image-only
//! (scanned) PDF. Each page is rasterized at a controlled scale, run through
//! text recognition to obtain word-level geometry and confidence, and
//! re-synthesized as a page that looks identical to the original but carries
//! an invisible, position-aligned text layer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use durchsicht::{ReconstructionConfig, reconstruct_bytes_sync};
//!
//! # fn main() -> durchsicht::Result<()> {
//! let payload = std::fs::read("scanned.pdf")?;
//! let config = ReconstructionConfig::default();
//!
//! let output = reconstruct_bytes_sync(&payload, &config)?;
//! std::fs::write("searchable.pdf", &output.pdf)?;
//!
//! if !output.report.low_confidence_pages.is_empty() {
//!     eprintln!("low recognition confidence on pages {:?}", output.report.low_confidence_pages);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **`pdf`**: source-document access (page counting, scan detection, page
//!   rasterization via `pdfium-render`) and output synthesis (`lopdf`)
//! - **`ocr`**: Tesseract recognition with word-level TSV geometry, behind a
//!   backend trait
//! - **`geometry`**: the pure recognition-space to output-space reconciler
//! - **`pipeline`**: per-document assembly, confidence reporting, failure
//!   policy
//!
//! # Coordinate contract
//!
//! Recognition results are pixels from the raster's top-left corner at the
//! configured scale; output pages are points from the bottom-left corner at
//! scale 1.0. The same scale must be used for rasterization and placement —
//! mixing scales corrupts placement.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod types;

pub use config::ReconstructionConfig;
pub use error::{DurchsichtError, Result};
pub use types::{
    CancelFlag, PageRecognition, ProgressCallback, ProgressUpdate, RecognizedWord, ReconstructionOutput,
    ReconstructionReport, WordBox,
};

pub use pipeline::{
    DocumentReconstructor, needs_ocr_bytes, needs_ocr_sync, reconstruct_bytes, reconstruct_bytes_sync,
    reconstruct_bytes_with_progress, reconstruct_file,
};

pub use ocr::{RecognitionBackend, RecognitionOptions, TesseractEngine};
pub use pdf::image_to_pdf;
