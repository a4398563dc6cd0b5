use super::error::PdfError;
use pdfium_render::prelude::*;

/// Bind to the system Pdfium library.
///
/// A fresh binding is created per call; `map_err` lets each call site map
/// the failure into its own stage-specific [`PdfError`] variant.
pub(crate) fn bind_pdfium(
    map_err: fn(String) -> PdfError,
    context: &'static str,
) -> Result<Box<dyn PdfiumLibraryBindings>, PdfError> {
    Pdfium::bind_to_system_library()
        .map_err(|e| map_err(format!("Pdfium initialization failed ({}): {}", context, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_pdfium() {
        let result = bind_pdfium(PdfError::RenderingFailed, "test context");
        assert!(result.is_ok(), "system Pdfium library should bind");
    }

    #[test]
    fn test_bind_pdfium_error_mapping() {
        let map_err = PdfError::TextProbeFailed as fn(String) -> PdfError;
        let test_error = map_err("test".to_string());
        assert!(matches!(test_error, PdfError::TextProbeFailed(msg) if msg == "test"));
    }
}
