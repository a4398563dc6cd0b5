//! PDF document processing.
//!
//! This module owns both ends of the pipeline's PDF contract: reading the
//! source document (page counting, scan detection, page rasterization via
//! `pdfium-render`) and writing the reconstructed output document (image
//! plus invisible text layer via `lopdf`).
pub mod bindings;
pub mod error;
pub mod probe;
pub mod rendering;
pub mod writer;

pub use error::PdfError;
pub use probe::{ScanProbe, needs_ocr};
pub use rendering::{PageRasterizer, RasterPage};
pub use writer::{DocumentWriter, TextRun, image_to_pdf};
