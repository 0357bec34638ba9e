//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestTemplateBuilder` - Builder pattern for templates with fixed element ids
//! - `png_bytes()` - Encoded solid-color images for image stores
//! - Common assertions on sessions and templates

#![allow(dead_code)]

use certdesigner::editor::EditorSession;
use certdesigner::geometry::{Point, Rect};
use certdesigner::types::{
    CertificateElement, CertificateTemplate, ElementId, ElementKind, ElementType, ImageRef,
    TextStyle,
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

// ============================================================================
// TestTemplateBuilder - Builder pattern for creating test templates
// ============================================================================

/// Builder for templates whose elements have predictable ids.
///
/// # Example
/// ```ignore
/// let template = TestTemplateBuilder::new()
///     .with_static_text("title", "Certificate", (100.0, 50.0))
///     .with_image("logo", Some("logo.png"), (20.0, 20.0, 150.0, 150.0))
///     .build();
/// ```
pub struct TestTemplateBuilder {
    template: CertificateTemplate,
}

impl Default for TestTemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTemplateBuilder {
    /// Default 800×566 canvas, no background.
    pub fn new() -> Self {
        Self {
            template: CertificateTemplate::default(),
        }
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.template.canvas_width = width;
        self.template.canvas_height = height;
        self
    }

    pub fn with_background(mut self, reference: &str) -> Self {
        self.template.background_reference = Some(ImageRef::new(reference));
        self
    }

    /// Element of `element_type` with its default size at `pos`.
    pub fn with_element(mut self, id: &str, element_type: ElementType, pos: (f32, f32)) -> Self {
        let mut element = CertificateElement::new(element_type, Point::new(pos.0, pos.1));
        element.id = ElementId::new(id);
        self.template.elements.push(element);
        self
    }

    /// Static text with default style in a 200×40 box.
    pub fn with_static_text(mut self, id: &str, content: &str, pos: (f32, f32)) -> Self {
        self.template.elements.push(CertificateElement {
            id: ElementId::new(id),
            x: pos.0,
            y: pos.1,
            width: 200.0,
            height: 40.0,
            kind: ElementKind::StaticText {
                content: content.to_string(),
                style: TextStyle::default(),
            },
        });
        self
    }

    pub fn with_variable_text(mut self, id: &str, key: &str, fallback: &str, pos: (f32, f32)) -> Self {
        self.template.elements.push(CertificateElement {
            id: ElementId::new(id),
            x: pos.0,
            y: pos.1,
            width: 300.0,
            height: 40.0,
            kind: ElementKind::VariableText {
                variable_key: key.to_string(),
                content: fallback.to_string(),
                style: TextStyle::default(),
            },
        });
        self
    }

    pub fn with_image(mut self, id: &str, reference: Option<&str>, bounds: (f32, f32, f32, f32)) -> Self {
        self.template.elements.push(CertificateElement {
            id: ElementId::new(id),
            x: bounds.0,
            y: bounds.1,
            width: bounds.2,
            height: bounds.3,
            kind: ElementKind::Image {
                image_reference: reference.map(ImageRef::new),
            },
        });
        self
    }

    pub fn with_qr(mut self, id: &str, data: &str, bounds: (f32, f32, f32, f32)) -> Self {
        self.template.elements.push(CertificateElement {
            id: ElementId::new(id),
            x: bounds.0,
            y: bounds.1,
            width: bounds.2,
            height: bounds.3,
            kind: ElementKind::QrCode {
                image_reference: None,
                data: Some(data.to_string()),
            },
        });
        self
    }

    pub fn build(self) -> CertificateTemplate {
        self.template
    }

    /// Session at zoom 1, no pan.
    pub fn session(self) -> EditorSession {
        EditorSession::new(self.template)
    }
}

// ============================================================================
// Images
// ============================================================================

/// PNG-encoded `width × height` image of a single color.
pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

// ============================================================================
// Assertions
// ============================================================================

pub fn bounds_of(session: &EditorSession, id: &str) -> Rect {
    session
        .template()
        .element(&ElementId::new(id))
        .map(|e| e.bounds())
        .unwrap_or_else(|| panic!("no element {id}"))
}

/// Every element satisfies the position and minimum-size invariants.
pub fn assert_template_invariants(template: &CertificateTemplate) {
    for element in &template.elements {
        assert!(element.x >= 0.0, "{} x = {}", element.id, element.x);
        assert!(element.y >= 0.0, "{} y = {}", element.id, element.y);
        assert!(element.width >= 50.0, "{} width = {}", element.id, element.width);
        assert!(element.height >= 30.0, "{} height = {}", element.id, element.height);
    }
}

pub fn assert_idle(session: &EditorSession) {
    assert!(session.input_state().is_idle(), "state: {:?}", session.input_state());
    assert!(session.ghost().is_none());
    assert_eq!(session.active_captures(), 0);
}
