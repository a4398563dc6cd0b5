//! Coordinate reconciliation between recognition space and output space.
//!
//! Recognition space is pixels from the page's top-left corner, at the
//! raster scale the page was rendered at. Output space is points from the
//! page's bottom-left corner, at scale 1.0. Mapping between the two divides
//! out the scale, flips the vertical axis, and re-anchors each word at the
//! bottom edge of its glyph box:
//!
//! ```text
//! x         = x0 / s
//! font_size = (y1 - y0) / s
//! y         = H - y1 / s
//! ```
//!
//! where `s` is the raster scale and `H` the output page height in points.
//! Font size is approximated from glyph box height; no font metrics are
//! available for arbitrary recognized glyphs, so box height is the nearest
//! observable proxy.
use crate::types::WordBox;

/// A word's resolved position in output space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    /// Distance from the page's left edge, in points.
    pub x: f64,
    /// Distance from the page's bottom edge to the glyph box's lower edge,
    /// in points.
    pub y: f64,
    pub font_size: f64,
}

/// Output page size in points for a raster of the given pixel dimensions.
///
/// Derived by division so the output aspect ratio equals the raster aspect
/// ratio exactly.
pub fn page_point_size(pixel_width: u32, pixel_height: u32, scale: f64) -> (f64, f64) {
    (f64::from(pixel_width) / scale, f64::from(pixel_height) / scale)
}

/// Map one recognition-space box to its output-space placement.
///
/// Returns `None` for degenerate boxes (zero or negative extent); callers
/// skip those with a warning instead of emitting a zero-size draw call.
/// Surviving font sizes are floored at `min_font_size`.
pub fn place_word(bbox: &WordBox, scale: f64, page_height: f64, min_font_size: f64) -> Option<TextPlacement> {
    if bbox.is_degenerate() {
        return None;
    }

    Some(TextPlacement {
        x: bbox.x0 / scale,
        y: page_height - bbox.y1 / scale,
        font_size: (bbox.height() / scale).max(min_font_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_flip_anchors_at_glyph_bottom() {
        // 300px-tall raster at scale 3 => 100pt page; y1=60px => y = 100 - 20 = 80pt
        let bbox = WordBox::new(30.0, 30.0, 120.0, 60.0);
        let (_, page_height) = page_point_size(300, 300, 3.0);
        let placement = place_word(&bbox, 3.0, page_height, 1.0).unwrap();

        assert_eq!(placement.y, 80.0);
        assert_eq!(placement.x, 10.0);
    }

    #[test]
    fn test_font_size_from_box_height() {
        let bbox = WordBox::new(0.0, 0.0, 90.0, 30.0);
        let placement = place_word(&bbox, 3.0, 100.0, 1.0).unwrap();
        assert_eq!(placement.font_size, 10.0);
    }

    #[test]
    fn test_page_point_size_divides_exactly() {
        let (width, height) = page_point_size(1836, 2376, 3.0);
        assert_eq!(width, 612.0);
        assert_eq!(height, 792.0);
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let (width, height) = page_point_size(1500, 2000, 2.0);
        assert_eq!(width / height, 1500.0 / 2000.0);
    }

    #[test]
    fn test_degenerate_box_is_skipped() {
        let flat = WordBox::new(10.0, 40.0, 50.0, 40.0);
        assert_eq!(place_word(&flat, 3.0, 100.0, 1.0), None);

        let inverted = WordBox::new(50.0, 10.0, 10.0, 40.0);
        assert_eq!(place_word(&inverted, 3.0, 100.0, 1.0), None);
    }

    #[test]
    fn test_tiny_box_floored_to_min_font_size() {
        // 1px tall at scale 3 => 0.33pt, floored to 1pt
        let bbox = WordBox::new(0.0, 0.0, 10.0, 1.0);
        let placement = place_word(&bbox, 3.0, 100.0, 1.0).unwrap();
        assert_eq!(placement.font_size, 1.0);
    }

    #[test]
    fn test_scale_one_is_identity_on_x() {
        let bbox = WordBox::new(42.0, 10.0, 80.0, 22.0);
        let placement = place_word(&bbox, 1.0, 200.0, 1.0).unwrap();
        assert_eq!(placement.x, 42.0);
        assert_eq!(placement.y, 178.0);
        assert_eq!(placement.font_size, 12.0);
    }

    #[test]
    fn test_server_scale_two() {
        // Mirrors the latency-oriented server configuration
        let bbox = WordBox::new(100.0, 200.0, 300.0, 260.0);
        let placement = place_word(&bbox, 2.0, 400.0, 1.0).unwrap();
        assert_eq!(placement.x, 50.0);
        assert_eq!(placement.y, 400.0 - 130.0);
        assert_eq!(placement.font_size, 30.0);
    }
}
