//! Glyph rendering for canvas text.
//!
//! A [`FontBook`] maps each [`FontFamily`] to a TrueType face loaded from the
//! configured font directory (rendered anti-aliased with `ab_glyph`). Families
//! without a registered face fall back to the built-in Spleen bitmap font,
//! scaled nearest-neighbor to the requested size.
//!
//! Layout follows the designer: words wrap at the element width, explicit
//! newlines break lines, lines are 1.2× the font size, and the block is
//! centered vertically inside the element box.

use crate::geometry::Rect;
use crate::types::{FontFamily, TextAlign};
use ab_glyph::{Font, FontArc, ScaleFont};
use image::{Pixel, Rgba, RgbaImage};
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Spleen cells are twice as tall as they are wide.
const BITMAP_ASPECT: f32 = 0.5;

#[derive(Clone, Default)]
pub struct FontBook {
    faces: HashMap<FontFamily, FontArc>,
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidLine {
    pub text: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<LaidLine>,
    pub font_px: f32,
    pub line_height: f32,
}

impl TextLayout {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

impl FontBook {
    /// Bitmap fallback only.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load every `.ttf`/`.otf` in `dir` whose file stem names a family
    /// (`arial.ttf`, `Times New Roman.ttf`, `courier_new.otf`...).
    /// Unreadable files are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Self {
        let mut book = Self::default();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Font directory unreadable, using bitmap font");
                return book;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if !is_font {
                continue;
            }
            let Some(family) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(family_for_stem)
            else {
                continue;
            };
            match std::fs::read(&path) {
                Ok(bytes) => {
                    if let Err(e) = book.register(family, bytes) {
                        warn!(path = %path.display(), error = %e, "Invalid font file");
                    }
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to read font"),
            }
        }
        debug!(faces = book.faces.len(), "Font book loaded");
        book
    }

    pub fn register(&mut self, family: FontFamily, bytes: Vec<u8>) -> Result<(), ab_glyph::InvalidFont> {
        let font = FontArc::try_from_vec(bytes)?;
        self.faces.insert(family, font);
        Ok(())
    }

    pub fn has_face(&self, family: FontFamily) -> bool {
        self.faces.contains_key(&family)
    }

    fn face(&self, family: FontFamily) -> Face<'_> {
        match self.faces.get(&family) {
            Some(font) => Face::Outline(font),
            None => Face::Bitmap,
        }
    }

    /// Width of a single line of text at `font_px`.
    pub fn measure(&self, text: &str, family: FontFamily, font_px: f32) -> f32 {
        self.face(family).measure(text, font_px)
    }

    /// Break `text` into lines no wider than `max_width` where possible.
    /// A single word wider than the box stays on its own line.
    pub fn layout(&self, text: &str, family: FontFamily, font_px: f32, max_width: f32) -> TextLayout {
        let face = self.face(family);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if current.is_empty() || face.measure(&candidate, font_px) <= max_width {
                    current = candidate;
                } else {
                    let width = face.measure(&current, font_px);
                    lines.push(LaidLine {
                        text: std::mem::replace(&mut current, word.to_string()),
                        width,
                    });
                }
            }
            let width = face.measure(&current, font_px);
            lines.push(LaidLine { text: current, width });
        }

        TextLayout {
            lines,
            font_px,
            line_height: font_px * LINE_HEIGHT,
        }
    }

    /// Paint `text` inside `rect` on `target`.
    pub fn draw(
        &self,
        target: &mut RgbaImage,
        text: &str,
        rect: &Rect,
        family: FontFamily,
        font_px: f32,
        align: TextAlign,
        color: Rgba<u8>,
    ) {
        if font_px < 1.0 || text.trim().is_empty() {
            return;
        }
        let face = self.face(family);
        let layout = self.layout(text, family, font_px, rect.width);
        let mut top = rect.y + (rect.height - layout.height()) / 2.0;

        for line in &layout.lines {
            let left = match align {
                TextAlign::Left => rect.x,
                TextAlign::Center => rect.x + (rect.width - line.width) / 2.0,
                TextAlign::Right => rect.right() - line.width,
            };
            // Half-leading above the glyph box.
            let glyph_top = top + (layout.line_height - font_px) / 2.0;
            face.draw_line(target, &line.text, left, glyph_top, font_px, color);
            top += layout.line_height;
        }
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn family_for_stem(stem: &str) -> Option<FontFamily> {
    let key: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    FontFamily::ALL.into_iter().find(|family| {
        let name: String = family
            .css_name()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        name == key
    })
}

enum Face<'a> {
    Outline(&'a FontArc),
    Bitmap,
}

impl Face<'_> {
    fn measure(&self, text: &str, font_px: f32) -> f32 {
        match self {
            Face::Outline(font) => {
                let scaled = font.as_scaled(font_px);
                text.chars().map(|ch| scaled.h_advance(font.glyph_id(ch))).sum()
            }
            Face::Bitmap => text.chars().count() as f32 * font_px * BITMAP_ASPECT,
        }
    }

    fn draw_line(&self, target: &mut RgbaImage, text: &str, left: f32, top: f32, font_px: f32, color: Rgba<u8>) {
        match self {
            Face::Outline(font) => draw_outline_line(font, target, text, left, top, font_px, color),
            Face::Bitmap => draw_bitmap_line(target, text, left, top, font_px, color),
        }
    }
}

fn draw_outline_line(
    font: &FontArc,
    target: &mut RgbaImage,
    text: &str,
    left: f32,
    top: f32,
    font_px: f32,
    color: Rgba<u8>,
) {
    let scaled = font.as_scaled(font_px);
    let baseline = top + scaled.ascent();
    let mut caret = left;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(font_px, ab_glyph::point(caret, baseline));
        caret += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i64 + bounds.min.x as i64;
                let y = py as i64 + bounds.min.y as i64;
                blend_coverage(target, x, y, color, coverage);
            });
        }
    }
}

fn draw_bitmap_line(target: &mut RgbaImage, text: &str, left: f32, top: f32, font_px: f32, color: Rgba<u8>) {
    let (data, cell_w, cell_h) = if font_px < 18.0 {
        (FONT_6X12, 6usize, 12usize)
    } else if font_px < 32.0 {
        (FONT_8X16, 8, 16)
    } else {
        (FONT_12X24, 12, 24)
    };
    let Ok(mut spleen) = PSF2Font::new(data) else {
        return;
    };

    let glyph_h = font_px.round().max(1.0) as usize;
    let glyph_w = (font_px * BITMAP_ASPECT).round().max(1.0) as usize;
    let mut cell = vec![false; cell_w * cell_h];
    let mut utf8 = [0u8; 4];

    for (i, ch) in text.chars().enumerate() {
        if ch == ' ' {
            continue;
        }
        cell.fill(false);
        let encoded = ch.encode_utf8(&mut utf8);
        match spleen.glyph_for_utf8(encoded.as_bytes()) {
            Some(glyph) => {
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if row_y < cell_h && col_x < cell_w {
                            cell[row_y * cell_w + col_x] = on;
                        }
                    }
                }
            }
            None => draw_box(&mut cell, cell_w, cell_h),
        }

        let origin_x = (left + i as f32 * font_px * BITMAP_ASPECT).round() as i64;
        let origin_y = top.round() as i64;
        // Nearest-neighbor scale from the cell to the glyph box.
        for dy in 0..glyph_h {
            let sy = dy * cell_h / glyph_h;
            for dx in 0..glyph_w {
                let sx = dx * cell_w / glyph_w;
                if cell[sy * cell_w + sx] {
                    blend_coverage(target, origin_x + dx as i64, origin_y + dy as i64, color, 1.0);
                }
            }
        }
    }
}

fn draw_box(cell: &mut [bool], width: usize, height: usize) {
    for x in 0..width {
        cell[x] = true;
        cell[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        cell[y * width] = true;
        cell[y * width + width - 1] = true;
    }
}

/// Alpha-blend `color` at `coverage` onto one pixel; out-of-bounds is a no-op.
pub(crate) fn blend_coverage(target: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= target.width() as i64 || y >= target.height() as i64 {
        return;
    }
    let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
    if alpha == 0 {
        return;
    }
    let top = Rgba([color[0], color[1], color[2], alpha]);
    target.get_pixel_mut(x as u32, y as u32).blend(&top);
}
