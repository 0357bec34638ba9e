//! Core types for the certificate designer.
//!
//! A [`CertificateTemplate`] is a background plus an ordered list of
//! [`CertificateElement`]s on a fixed-size canvas. Element order is paint
//! order: the last element is topmost. The serde representation doubles as
//! the template load/save contract ([`TemplateRecord`]).

use crate::constants::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_FONT_SIZE, DEFAULT_IMAGE_SIZE,
    DEFAULT_QR_SIZE, DEFAULT_SIGNATURE_SIZE, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_SIZE,
    MAX_FONT_SIZE, MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH, MIN_FONT_SIZE,
};
use crate::error::TemplateError;
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// Identifiers and references
// ============================================================================

/// Unique element identifier within a template.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Issue a fresh id.
    pub fn generate() -> Self {
        Self(format!("el-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque handle to a binary image: a store key, a URL, or a `data:` URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_url(&self) -> bool {
        self.0.starts_with("data:")
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URLs can be megabytes long; keep logs readable
        if self.is_data_url() && self.0.len() > 48 {
            let head: String = self.0.chars().take(48).collect();
            write!(f, "{head}…")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Text style
// ============================================================================

/// The fixed list of font families offered by the designer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Arial,
    Helvetica,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    Georgia,
    Verdana,
    #[serde(rename = "Courier New")]
    CourierNew,
}

impl FontFamily {
    pub const ALL: [FontFamily; 6] = [
        FontFamily::Arial,
        FontFamily::Helvetica,
        FontFamily::TimesNewRoman,
        FontFamily::Georgia,
        FontFamily::Verdana,
        FontFamily::CourierNew,
    ];

    /// CSS family name, also used as the font file stem in the font directory.
    pub fn css_name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Georgia => "Georgia",
            FontFamily::Verdana => "Verdana",
            FontFamily::CourierNew => "Courier New",
        }
    }

    pub fn is_monospace(self) -> bool {
        matches!(self, FontFamily::CourierNew)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Style shared by static and variable text elements.
/// Fields missing from a stored record take their [`Default`] values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_family: FontFamily,
    /// Hex color, `#rrggbb` or `#rgb`
    pub color: String,
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            color: DEFAULT_TEXT_COLOR.to_string(),
            text_align: TextAlign::default(),
        }
    }
}

impl TextStyle {
    pub fn clamp_font_size(size: f32) -> f32 {
        if size.is_finite() {
            size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            DEFAULT_FONT_SIZE
        }
    }
}

// ============================================================================
// Variable placeholders
// ============================================================================

/// Placeholder keys the designer offers for variable text.
///
/// Elements store the raw key string, so keys outside this set survive a
/// load/save round trip; they simply never resolve and fall back to the
/// element's literal content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKey {
    Name,
    Email,
    Activity,
    Date,
    Id,
    University,
    Gender,
}

impl VariableKey {
    pub const ALL: [VariableKey; 7] = [
        VariableKey::Name,
        VariableKey::Email,
        VariableKey::Activity,
        VariableKey::Date,
        VariableKey::Id,
        VariableKey::University,
        VariableKey::Gender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VariableKey::Name => "name",
            VariableKey::Email => "email",
            VariableKey::Activity => "activity",
            VariableKey::Date => "date",
            VariableKey::Id => "id",
            VariableKey::University => "university",
            VariableKey::Gender => "gender",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VariableKey::Name => "Participant Name",
            VariableKey::Email => "Email",
            VariableKey::Activity => "Activity Name",
            VariableKey::Date => "Date",
            VariableKey::Id => "Registration ID",
            VariableKey::University => "University",
            VariableKey::Gender => "Gender",
        }
    }

    pub fn parse(key: &str) -> Option<VariableKey> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

// ============================================================================
// Elements
// ============================================================================

/// Element variant without payload, used to request new elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    StaticText,
    VariableText,
    Image,
    QrCode,
    Signature,
}

impl ElementType {
    pub fn default_size(self) -> (f32, f32) {
        match self {
            ElementType::StaticText | ElementType::VariableText => DEFAULT_TEXT_SIZE,
            ElementType::Image => DEFAULT_IMAGE_SIZE,
            ElementType::QrCode => DEFAULT_QR_SIZE,
            ElementType::Signature => DEFAULT_SIGNATURE_SIZE,
        }
    }

    /// Label painted on an empty image-like element.
    pub fn placeholder_label(self) -> &'static str {
        match self {
            ElementType::StaticText => "Text",
            ElementType::VariableText => "Variable",
            ElementType::Image => "Image",
            ElementType::QrCode => "QR Code",
            ElementType::Signature => "Signature",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, ElementType::StaticText | ElementType::VariableText)
    }
}

/// Per-variant element payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    StaticText {
        content: String,
        #[serde(flatten)]
        style: TextStyle,
    },
    VariableText {
        variable_key: String,
        /// Literal fallback used when the participant record lacks the key
        #[serde(default)]
        content: String,
        #[serde(flatten)]
        style: TextStyle,
    },
    Image {
        #[serde(default)]
        image_reference: Option<ImageRef>,
    },
    QrCode {
        #[serde(default)]
        image_reference: Option<ImageRef>,
        /// Payload template with `{{key}}` placeholders; encoded at export
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },
    Signature {
        #[serde(default)]
        image_reference: Option<ImageRef>,
    },
}

impl ElementKind {
    /// Type-specific defaults for a freshly added element.
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::StaticText => ElementKind::StaticText {
                content: crate::constants::DEFAULT_STATIC_TEXT.to_string(),
                style: TextStyle::default(),
            },
            ElementType::VariableText => ElementKind::VariableText {
                variable_key: VariableKey::Name.as_str().to_string(),
                content: VariableKey::Name.label().to_string(),
                style: TextStyle {
                    font_size: 24.0,
                    ..TextStyle::default()
                },
            },
            ElementType::Image => ElementKind::Image {
                image_reference: None,
            },
            ElementType::QrCode => ElementKind::QrCode {
                image_reference: None,
                data: None,
            },
            ElementType::Signature => ElementKind::Signature {
                image_reference: None,
            },
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::StaticText { .. } => ElementType::StaticText,
            ElementKind::VariableText { .. } => ElementType::VariableText,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::QrCode { .. } => ElementType::QrCode,
            ElementKind::Signature { .. } => ElementType::Signature,
        }
    }
}

/// One positioned, typed visual unit on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CertificateElement {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CertificateElement {
    /// New element of `element_type` with default size and style at `position`.
    pub fn new(element_type: ElementType, position: Point) -> Self {
        let (width, height) = element_type.default_size();
        Self {
            id: ElementId::generate(),
            x: position.x,
            y: position.y,
            width,
            height,
            kind: ElementKind::default_for(element_type),
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_bounds(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            ElementKind::StaticText { style, .. } | ElementKind::VariableText { style, .. } => {
                Some(style)
            }
            _ => None,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            ElementKind::StaticText { style, .. } | ElementKind::VariableText { style, .. } => {
                Some(style)
            }
            _ => None,
        }
    }

    /// Bound image for image-like elements.
    pub fn image_reference(&self) -> Option<&ImageRef> {
        match &self.kind {
            ElementKind::Image { image_reference }
            | ElementKind::QrCode { image_reference, .. }
            | ElementKind::Signature { image_reference } => image_reference.as_ref(),
            _ => None,
        }
    }

    pub fn is_image_like(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Image { .. } | ElementKind::QrCode { .. } | ElementKind::Signature { .. }
        )
    }

    /// Enforce position, size, and font-size limits in place.
    /// Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let before = (self.x, self.y, self.width, self.height);
        self.x = finite_or_zero(self.x).max(0.0);
        self.y = finite_or_zero(self.y).max(0.0);
        self.width = finite_or_zero(self.width).max(MIN_ELEMENT_WIDTH);
        self.height = finite_or_zero(self.height).max(MIN_ELEMENT_HEIGHT);
        let mut changed = before != (self.x, self.y, self.width, self.height);

        if let Some(style) = self.text_style_mut() {
            let clamped = TextStyle::clamp_font_size(style.font_size);
            if clamped != style.font_size {
                style.font_size = clamped;
                changed = true;
            }
        }
        changed
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

// ============================================================================
// Partial updates
// ============================================================================

/// Field-wise partial update for an element.
///
/// Used both for `add_element` overrides and `update_element`. Fields that do
/// not apply to the element's variant are ignored. `image_reference` is
/// doubly optional so callers can clear a binding with `Some(None)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub content: Option<String>,
    pub variable_key: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<FontFamily>,
    pub color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub image_reference: Option<Option<ImageRef>>,
    pub qr_data: Option<Option<String>>,
}

impl ElementPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn bounds(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn image(reference: Option<ImageRef>) -> Self {
        Self {
            image_reference: Some(reference),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to `element`, then re-establish its invariants.
    pub fn apply_to(&self, element: &mut CertificateElement) {
        if let Some(x) = self.x {
            element.x = x;
        }
        if let Some(y) = self.y {
            element.y = y;
        }
        if let Some(w) = self.width {
            element.width = w;
        }
        if let Some(h) = self.height {
            element.height = h;
        }

        match &mut element.kind {
            ElementKind::StaticText { content, .. } => {
                if let Some(c) = &self.content {
                    *content = c.clone();
                }
            }
            ElementKind::VariableText {
                variable_key,
                content,
                ..
            } => {
                if let Some(k) = &self.variable_key {
                    *variable_key = k.clone();
                }
                if let Some(c) = &self.content {
                    *content = c.clone();
                }
            }
            ElementKind::QrCode {
                image_reference,
                data,
            } => {
                if let Some(r) = &self.image_reference {
                    *image_reference = r.clone();
                }
                if let Some(d) = &self.qr_data {
                    *data = d.clone();
                }
            }
            ElementKind::Image { image_reference } | ElementKind::Signature { image_reference } => {
                if let Some(r) = &self.image_reference {
                    *image_reference = r.clone();
                }
            }
        }

        if let Some(style) = element.text_style_mut() {
            if let Some(size) = self.font_size {
                style.font_size = size;
            }
            if let Some(family) = self.font_family {
                style.font_family = family;
            }
            if let Some(color) = &self.color {
                style.color = color.clone();
            }
            if let Some(align) = self.text_align {
                style.text_align = align;
            }
        }

        element.sanitize();
    }
}

// ============================================================================
// Template
// ============================================================================

/// Page orientation derived from the canvas aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// The full layout: background, ordered elements, canvas size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateTemplate {
    #[serde(default)]
    pub background_reference: Option<ImageRef>,
    #[serde(default)]
    pub elements: Vec<CertificateElement>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for CertificateTemplate {
    fn default() -> Self {
        Self {
            background_reference: None,
            elements: Vec::new(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl CertificateTemplate {
    pub fn with_canvas(width: u32, height: u32) -> Self {
        Self {
            canvas_width: width.max(1),
            canvas_height: height.max(1),
            ..Self::default()
        }
    }

    pub fn element(&self, id: &ElementId) -> Option<&CertificateElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut CertificateElement> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.canvas_width as f32, self.canvas_height as f32)
    }

    pub fn orientation(&self) -> Orientation {
        if self.canvas_width > self.canvas_height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Re-establish template invariants after loading untrusted data:
    /// unique ids, non-negative positions, minimum sizes, font-size range,
    /// and a positive canvas.
    pub fn sanitize(&mut self) {
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);

        let mut seen = HashSet::new();
        for element in &mut self.elements {
            if !seen.insert(element.id.clone()) {
                let fresh = ElementId::generate();
                debug!(duplicate = %element.id, replacement = %fresh, "Re-issued duplicate element id");
                element.id = fresh.clone();
                seen.insert(fresh);
            }
            if element.sanitize() {
                debug!(element_id = %element.id, "Clamped element to template limits");
            }
        }
    }
}

// ============================================================================
// Load/save contract
// ============================================================================

/// Template record exchanged with the external persistence layer.
///
/// The background reference appears both at the top level and inside
/// `templateData`; on load the inner one wins when both are present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub name: String,
    #[serde(default)]
    pub background_reference: Option<ImageRef>,
    pub template_data: CertificateTemplate,
}

impl TemplateRecord {
    /// Build the save payload for `template`.
    pub fn from_template(name: impl Into<String>, template: &CertificateTemplate) -> Self {
        Self {
            name: name.into(),
            background_reference: template.background_reference.clone(),
            template_data: template.clone(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let record: TemplateRecord = serde_json::from_str(json)?;
        let data = &record.template_data;
        if data.canvas_width == 0 || data.canvas_height == 0 {
            return Err(TemplateError::InvalidCanvas {
                width: data.canvas_width,
                height: data.canvas_height,
            });
        }
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &std::path::Path) -> Result<(), TemplateError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// The editable template, sanitized.
    pub fn into_template(self) -> CertificateTemplate {
        let mut template = self.template_data;
        if template.background_reference.is_none() {
            template.background_reference = self.background_reference;
        }
        template.sanitize();
        template
    }
}
