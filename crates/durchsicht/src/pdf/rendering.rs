//! PDF page rasterization.
//!
//! Renders one page of a source PDF to a raster image whose pixel
//! dimensions are the page's native point dimensions multiplied by the
//! raster scale. Pdfium clears the bitmap to opaque white before painting,
//! so un-inked regions carry no transparency that would confuse recognition
//! contrast.
use super::bindings::bind_pdfium;
use super::error::{PdfError, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;

/// One rasterized page, owned by exactly one reconstruction step and
/// released when that page's synthesis is done.
pub struct RasterPage {
    pub image: DynamicImage,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

pub struct PageRasterizer {
    pdfium: Pdfium,
}

impl PageRasterizer {
    pub fn new() -> Result<Self> {
        let binding = bind_pdfium(PdfError::RenderingFailed, "page rendering")?;

        let pdfium = Pdfium::new(binding);
        Ok(Self { pdfium })
    }

    pub fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(classify_load_error)?;

        Ok(document.pages().len() as usize)
    }

    /// Render one page at `scale` times its native point size.
    pub fn render_page(&self, pdf_bytes: &[u8], page_index: usize, scale: f64) -> Result<RasterPage> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(classify_load_error)?;

        let page = document
            .pages()
            .get(page_index as u16)
            .map_err(|_| PdfError::PageNotFound(page_index))?;

        let width_points = page.width().value;
        let height_points = page.height().value;

        let config = PdfRenderConfig::new()
            .set_target_width(((f64::from(width_points) * scale) as i32).max(1))
            .set_target_height(((f64::from(height_points) * scale) as i32).max(1))
            .rotate_if_landscape(PdfPageRenderRotation::None, false);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfError::RenderingFailed(format!("Failed to render page: {}", e)))?;

        let image = bitmap.as_image().into_rgb8();
        let (pixel_width, pixel_height) = image.dimensions();

        Ok(RasterPage {
            image: DynamicImage::ImageRgb8(image),
            pixel_width,
            pixel_height,
        })
    }
}

/// Distinguish encrypted documents from garbage bytes when loading fails.
pub(crate) fn classify_load_error(err: PdfiumError) -> PdfError {
    classify_load_message(err.to_string())
}

fn classify_load_message(err_msg: String) -> PdfError {
    if err_msg.contains("password") || err_msg.contains("Password") {
        PdfError::PasswordRequired
    } else {
        PdfError::InvalidPdf(err_msg)
    }
}
