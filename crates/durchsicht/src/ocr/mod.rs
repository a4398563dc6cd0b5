//! Text recognition subsystem.
//!
//! Turns a rasterized page into a [`crate::types::PageRecognition`]: the
//! page's full text, word-level bounding geometry parsed from Tesseract's
//! TSV output, and engine-reported confidence. The backend is a trait seam
//! so the document assembler can be tested without a Tesseract install.
pub mod engine;
pub mod error;
pub mod tsv;

pub use engine::{RecognitionBackend, RecognitionOptions, RecognitionProgress, TesseractEngine};
pub use error::OcrError;
pub use tsv::{mean_confidence, parse_word_boxes};
