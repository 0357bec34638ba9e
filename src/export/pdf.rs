//! Single-page PDF assembly with `lopdf`.
//!
//! Page units are canvas pixels: a page is exactly `canvas_width ×
//! canvas_height` with its origin at the bottom-left, so canvas rectangles
//! are flipped on the y axis when placed. Images are embedded as
//! Flate-compressed RGB XObjects; transparency becomes a soft mask.

use super::ExportError;
use crate::geometry::Rect;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::io::Write;
use tracing::trace;

/// One run of invisible, selectable text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Left edge, canvas pixels
    pub x: f32,
    /// Baseline, canvas pixels from the top
    pub baseline: f32,
    pub font_size: f32,
}

pub struct PdfPage {
    doc: Document,
    width: u32,
    height: u32,
    operations: Vec<Operation>,
    xobjects: Dictionary,
    font: Option<ObjectId>,
    images: usize,
}

fn real(v: f32) -> Object {
    v.into()
}

impl PdfPage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            doc: Document::with_version("1.5"),
            width,
            height,
            operations: Vec::new(),
            xobjects: Dictionary::new(),
            font: None,
            images: 0,
        }
    }

    pub fn image_count(&self) -> usize {
        self.images
    }

    /// Paint `image` stretched over `rect` (canvas space, top-left origin).
    pub fn draw_image(&mut self, image: &DynamicImage, rect: &Rect, interpolate: bool) -> Result<(), ExportError> {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Ok(());
        }
        let name = self.embed_image(image, interpolate)?;
        let bottom = self.height as f32 - rect.y - rect.height;
        trace!(%name, x = rect.x, y = rect.y, w = rect.width, h = rect.height, "Placing image");

        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "cm",
            vec![
                real(rect.width),
                real(0.0),
                real(0.0),
                real(rect.height),
                real(rect.x),
                real(bottom),
            ],
        ));
        self.operations
            .push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.operations.push(Operation::new("Q", vec![]));
        Ok(())
    }

    /// Add text that is searchable and selectable but never painted.
    pub fn draw_invisible_text(&mut self, runs: &[TextRun]) {
        let runs: Vec<&TextRun> = runs.iter().filter(|r| !r.text.trim().is_empty()).collect();
        if runs.is_empty() {
            return;
        }
        self.ensure_font();

        self.operations.push(Operation::new("BT", vec![]));
        self.operations
            .push(Operation::new("Tr", vec![Object::Integer(3)]));
        for run in runs {
            self.operations.push(Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), real(run.font_size)],
            ));
            self.operations.push(Operation::new(
                "Tm",
                vec![
                    real(1.0),
                    real(0.0),
                    real(0.0),
                    real(1.0),
                    real(run.x),
                    real(self.height as f32 - run.baseline),
                ],
            ));
            self.operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
            ));
        }
        self.operations.push(Operation::new("ET", vec![]));
    }

    fn ensure_font(&mut self) {
        if self.font.is_some() {
            return;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        self.font = Some(id);
    }

    fn embed_image(&mut self, image: &DynamicImage, interpolate: bool) -> Result<String, ExportError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = width as usize * height as usize;

        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for p in rgba.pixels() {
            rgb.extend_from_slice(&[p[0], p[1], p[2]]);
            alpha.push(p[3]);
        }
        let translucent = alpha.iter().any(|&a| a < 255);

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Interpolate" => interpolate,
            "Filter" => "FlateDecode",
        };
        if translucent {
            let mask = self.doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                deflate(&alpha)?,
            ));
            dict.set("SMask", mask);
        }

        let id = self.doc.add_object(Stream::new(dict, deflate(&rgb)?));
        let name = format!("Im{}", self.images);
        self.xobjects.set(name.clone(), id);
        self.images += 1;
        Ok(name)
    }

    /// Serialize the finished single-page document.
    pub fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        let pages_id = self.doc.new_object_id();

        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut resources = dictionary! {
            "XObject" => std::mem::take(&mut self.xobjects),
        };
        if let Some(font) = self.font {
            resources.set("Font", dictionary! { "F1" => font });
        }
        let resources_id = self.doc.add_object(resources);

        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(self.width as i64),
            Object::Integer(self.height as i64),
        ];
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        self.doc.set_object(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
                "MediaBox" => media_box,
            },
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal("Certificate"),
            "Producer" => Object::string_literal(concat!("certdesigner ", env!("CARGO_PKG_VERSION"))),
        });
        self.doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

fn deflate(bytes: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Latin-1 subset of WinAnsi; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            v @ 0x20..=0x7e | v @ 0xa0..=0xff => v as u8,
            _ => b'?',
        })
        .collect()
}
