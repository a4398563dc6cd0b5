//! Output document synthesis.
//!
//! Builds the reconstructed PDF with `lopdf`: each page carries the raster
//! image as its visible layer, drawn over the full page rectangle, and one
//! positioned text run per recognized word as its invisible layer. Text is
//! drawn in Helvetica at a near-invisible fill alpha (an ExtGState, not a
//! hard-zero render mode) so viewers' hit-testing and "show invisible text"
//! debug modes keep working.
use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use super::error::{PdfError, Result};
use super::rendering::RasterPage;
use crate::geometry::{TextPlacement, page_point_size};

/// One word of the invisible layer, already reconciled into output space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub placement: TextPlacement,
}

/// Incremental builder for the reconstructed document.
///
/// Pages are appended in call order, which the assembler guarantees to be
/// source page order.
pub struct DocumentWriter {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    gstate_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl DocumentWriter {
    /// `text_alpha` is the fill alpha of the invisible text layer, in `[0, 1]`.
    pub fn new(text_alpha: f64) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let gstate_id = doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => real(text_alpha),
            "CA" => real(text_alpha),
        });

        Self {
            doc,
            pages_id,
            font_id,
            gstate_id,
            page_ids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append one page: the raster as the visible layer, `runs` as the
    /// invisible layer. The page's point size is the raster's pixel size
    /// divided by `scale`, so output aspect ratio equals raster aspect
    /// ratio exactly.
    pub fn add_page(&mut self, raster: &RasterPage, scale: f64, runs: &[TextRun]) -> Result<()> {
        let (page_width, page_height) = page_point_size(raster.pixel_width, raster.pixel_height, scale);

        let image_name = format!("Im{}", self.page_ids.len());
        let image_id = self.doc.add_object(image_xobject(&raster.image)?);

        let mut xobjects = Dictionary::new();
        xobjects.set(image_name.clone(), image_id);

        let resources = dictionary! {
            "Font" => dictionary! { "F0" => self.font_id },
            "ExtGState" => dictionary! { "GS0" => self.gstate_id },
            "XObject" => xobjects,
        };

        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(page_width),
                    0.into(),
                    0.into(),
                    real(page_height),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(image_name.into_bytes())]),
            Operation::new("Q", vec![]),
        ];

        if !runs.is_empty() {
            operations.push(Operation::new("gs", vec![Object::Name(b"GS0".to_vec())]));
        }

        for run in runs {
            let encoded = encode_win_ansi(&run.text);
            if encoded.is_empty() {
                tracing::warn!(text = %run.text, "word has no encodable glyphs, skipping");
                continue;
            }

            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F0".to_vec()), real(run.placement.font_size)]),
                Operation::new("Td", vec![real(run.placement.x), real(run.placement.y)]),
                Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
                Operation::new("ET", vec![]),
            ]);
        }

        let content = Content { operations };
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(page_width), real(page_height)],
            "Contents" => content_id,
            "Resources" => resources,
        });

        self.page_ids.push(page_id);
        Ok(())
    }

    /// Finalize the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = self.page_ids.len() as i64;

        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

/// Wrap a raster image payload (PNG or JPEG) into a single-page PDF at the
/// image's natural point size. No text layer is applied.
pub fn image_to_pdf(image_bytes: &[u8]) -> Result<Vec<u8>> {
    let image = image::load_from_memory(image_bytes)
        .map_err(|e| PdfError::WriteFailed(format!("Failed to decode image: {}", e)))?;
    let (pixel_width, pixel_height) = (image.width(), image.height());

    let raster = RasterPage {
        image,
        pixel_width,
        pixel_height,
    };

    // One pixel maps to one point; alpha is irrelevant without text runs.
    let mut writer = DocumentWriter::new(1.0);
    writer.add_page(&raster, 1.0, &[])?;
    writer.finish()
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Embed the raster as a DCTDecode image XObject.
fn image_xobject(image: &DynamicImage) -> Result<Stream> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| PdfError::WriteFailed(format!("Failed to encode page image: {}", e)))?;

    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    )
    .with_compression(false))
}

/// Encode text for a WinAnsi-encoded Type1 font, dropping characters the
/// encoding cannot represent. CP1252-specific punctuation keeps its slot so
/// search and copy remain faithful for the common typographic characters.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());

    for c in text.chars() {
        let code = match c {
            '\u{0020}'..='\u{007E}' => Some(c as u8),
            '\u{00A0}'..='\u{00FF}' => Some(c as u8),
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017D}' => Some(0x8E),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        };

        if let Some(code) = code {
            bytes.push(code);
        }
    }

    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn white_raster(pixel_width: u32, pixel_height: u32) -> RasterPage {
        let image = RgbImage::from_pixel(pixel_width, pixel_height, Rgb([255, 255, 255]));
        RasterPage {
            image: DynamicImage::ImageRgb8(image),
            pixel_width,
            pixel_height,
        }
    }

    fn run(text: &str, x: f64, y: f64, font_size: f64) -> TextRun {
        TextRun {
            text: text.to_string(),
            placement: TextPlacement { x, y, font_size },
        }
    }

    fn number(obj: &Object) -> f64 {
        match obj {
            Object::Integer(i) => *i as f64,
            Object::Real(f) => f64::from(*f),
            other => panic!("expected a number, got {:?}", other),
        }
    }

    fn media_box(bytes: &[u8], page_number: u32) -> Vec<f64> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page_number];
        let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
        page_dict
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(number)
            .collect()
    }

    fn page_operator_names(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        let mut pages = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let content = doc.get_page_content(page_id).unwrap();
            let content = Content::decode(&content).unwrap();
            pages.push(
                content
                    .operations
                    .iter()
                    .map(|op| op.operator.clone())
                    .collect::<Vec<String>>(),
            );
        }
        pages
    }

    #[test]
    fn test_empty_document_round_trips() {
        let writer = DocumentWriter::new(0.1);
        let bytes = writer.finish().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }

    #[test]
    fn test_page_dimensions_divide_raster_by_scale() {
        let mut writer = DocumentWriter::new(0.1);
        writer.add_page(&white_raster(1836, 2376), 3.0, &[]).unwrap();
        let bytes = writer.finish().unwrap();

        let media_box = media_box(&bytes, 1);
        assert_eq!(media_box[2], 612.0);
        assert_eq!(media_box[3], 792.0);
    }

    #[test]
    fn test_pages_keep_insertion_order() {
        let mut writer = DocumentWriter::new(0.1);
        writer.add_page(&white_raster(300, 300), 3.0, &[]).unwrap();
        writer.add_page(&white_raster(600, 300), 3.0, &[]).unwrap();
        writer.add_page(&white_raster(900, 300), 3.0, &[]).unwrap();
        assert_eq!(writer.page_count(), 3);

        let bytes = writer.finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        let expected_widths = [100.0, 200.0, 300.0];
        for (page_number, expected) in (1u32..=3).zip(expected_widths) {
            assert_eq!(media_box(&bytes, page_number)[2], expected);
        }
    }

    #[test]
    fn test_image_only_page_has_no_text_operators() {
        let mut writer = DocumentWriter::new(0.1);
        writer.add_page(&white_raster(300, 300), 3.0, &[]).unwrap();
        let bytes = writer.finish().unwrap();

        let operators = page_operator_names(&bytes).remove(0);
        assert!(operators.contains(&"Do".to_string()));
        assert!(!operators.contains(&"BT".to_string()));
        assert!(!operators.contains(&"Tj".to_string()));
    }

    #[test]
    fn test_each_word_becomes_one_text_run() {
        let runs = vec![
            run("Hello", 10.0, 80.0, 10.0),
            run("World", 45.0, 80.0, 10.0),
        ];

        let mut writer = DocumentWriter::new(0.1);
        writer.add_page(&white_raster(300, 300), 3.0, &runs).unwrap();
        let bytes = writer.finish().unwrap();

        let operators = page_operator_names(&bytes).remove(0);
        let text_runs = operators.iter().filter(|op| *op == "Tj").count();
        assert_eq!(text_runs, 2);
        // Image layer drawn before the text layer
        let do_pos = operators.iter().position(|op| op == "Do").unwrap();
        let bt_pos = operators.iter().position(|op| op == "BT").unwrap();
        assert!(do_pos < bt_pos);
    }

    #[test]
    fn test_unencodable_word_is_skipped() {
        let runs = vec![run("日本語", 10.0, 80.0, 10.0), run("latin", 45.0, 80.0, 10.0)];

        let mut writer = DocumentWriter::new(0.1);
        writer.add_page(&white_raster(300, 300), 3.0, &runs).unwrap();
        let bytes = writer.finish().unwrap();

        let operators = page_operator_names(&bytes).remove(0);
        assert_eq!(operators.iter().filter(|op| *op == "Tj").count(), 1);
    }

    #[test]
    fn test_text_layer_uses_transparency_gstate() {
        let runs = vec![run("Hello", 10.0, 80.0, 10.0)];

        let mut writer = DocumentWriter::new(0.1);
        writer.add_page(&white_raster(300, 300), 3.0, &runs).unwrap();
        let bytes = writer.finish().unwrap();

        let operators = page_operator_names(&bytes).remove(0);
        assert!(operators.contains(&"gs".to_string()));
    }

    #[test]
    fn test_image_to_pdf_natural_size() {
        let image = RgbImage::from_pixel(40, 25, Rgb([0, 128, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let bytes = image_to_pdf(&png).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let media_box = media_box(&bytes, 1);
        assert_eq!(media_box[2], 40.0);
        assert_eq!(media_box[3], 25.0);
    }

    #[test]
    fn test_image_to_pdf_rejects_garbage() {
        let result = image_to_pdf(b"definitely not an image");
        assert!(matches!(result, Err(PdfError::WriteFailed(_))));
    }

    #[test]
    fn test_encode_win_ansi_ascii_passthrough() {
        assert_eq!(encode_win_ansi("Hello"), b"Hello".to_vec());
    }

    #[test]
    fn test_encode_win_ansi_latin1() {
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_encode_win_ansi_cp1252_punctuation() {
        assert_eq!(encode_win_ansi("\u{201C}a\u{201D}"), vec![0x93, b'a', 0x94]);
        assert_eq!(encode_win_ansi("\u{2013}"), vec![0x96]);
        assert_eq!(encode_win_ansi("\u{20AC}"), vec![0x80]);
    }

    #[test]
    fn test_encode_win_ansi_drops_unmappable() {
        assert_eq!(encode_win_ansi("日本語"), Vec::<u8>::new());
        assert_eq!(encode_win_ansi("a日b"), vec![b'a', b'b']);
    }
}
