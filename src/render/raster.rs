//! Scene rasterization.
//!
//! Paints a [`Scene`] into an RGBA bitmap. Image nodes look up decoded images
//! in an [`ImageSet`]; missing images either paint the node's placeholder
//! fallback (editor preview) or nothing at all (export composition).

use super::canvas::{Scene, SceneNode};
use super::color;
use super::text::{FontBook, blend_coverage};
use crate::geometry::{Rect, fit_contain};
use crate::profile_scope;
use crate::types::{ElementId, FontFamily, TextAlign};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::Arc;

/// Decoded images available to one rasterization.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    pub background: Option<Arc<DynamicImage>>,
    pub elements: HashMap<ElementId, Arc<DynamicImage>>,
}

impl ImageSet {
    pub fn element(&self, id: &ElementId) -> Option<&DynamicImage> {
        self.elements.get(id).map(|image| image.as_ref())
    }

    pub fn insert(&mut self, id: ElementId, image: Arc<DynamicImage>) {
        self.elements.insert(id, image);
    }
}

/// Rasterize `scene` at its own surface size.
pub fn rasterize_scene(scene: &Scene, images: &ImageSet, fonts: &FontBook) -> RgbaImage {
    profile_scope!("rasterize_scene");

    let width = scene.size.width.ceil().max(1.0) as u32;
    let height = scene.size.height.ceil().max(1.0) as u32;
    let mut target = RgbaImage::from_pixel(width, height, scene.clear);

    for node in &scene.nodes {
        match node {
            SceneNode::Fill { rect, color } => fill_rect(&mut target, rect, *color),
            SceneNode::Background { rect, .. } => {
                if let Some(background) = &images.background {
                    draw_stretched(&mut target, background, rect);
                }
            }
            SceneNode::GridLine { rect } => fill_rect(&mut target, rect, color::GRID),
            SceneNode::Text {
                rect,
                text,
                style,
                font_px,
                ..
            } => fonts.draw(
                &mut target,
                text,
                rect,
                style.font_family,
                *font_px,
                style.text_align,
                color::text_color(&style.color),
            ),
            SceneNode::Image {
                element_id,
                rect,
                padding,
                fallback,
            } => match images.element(element_id) {
                Some(image) => draw_contained(&mut target, image, &rect.inset(*padding)),
                None => {
                    if let Some(label) = fallback {
                        draw_placeholder(&mut target, rect, label, fonts);
                    }
                }
            },
            SceneNode::Placeholder { rect, label, .. } => {
                draw_placeholder(&mut target, rect, label, fonts)
            }
            SceneNode::SelectionOutline { rect } => {
                stroke_rect(&mut target, rect, 2.0, color::SELECTION)
            }
            SceneNode::Handle { rect, .. } => {
                fill_rect(&mut target, rect, color::HANDLE_FILL);
                stroke_rect(&mut target, rect, 1.0, color::SELECTION);
            }
        }
    }

    target
}

/// Pixel span covered by `rect`, clipped to the target.
fn pixel_span(target: &RgbaImage, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x.round().max(0.0) as i64;
    let y0 = rect.y.round().max(0.0) as i64;
    let x1 = (rect.right().round() as i64).min(target.width() as i64);
    let y1 = (rect.bottom().round() as i64).min(target.height() as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

pub(crate) fn fill_rect(target: &mut RgbaImage, rect: &Rect, color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = pixel_span(target, rect) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            blend_coverage(target, x as i64, y as i64, color, 1.0);
        }
    }
}

fn stroke_rect(target: &mut RgbaImage, rect: &Rect, width: f32, color: Rgba<u8>) {
    let edges = [
        Rect::new(rect.x, rect.y, rect.width, width),
        Rect::new(rect.x, rect.bottom() - width, rect.width, width),
        Rect::new(rect.x, rect.y + width, width, (rect.height - width * 2.0).max(0.0)),
        Rect::new(rect.right() - width, rect.y + width, width, (rect.height - width * 2.0).max(0.0)),
    ];
    for edge in &edges {
        fill_rect(target, edge, color);
    }
}

fn draw_placeholder(target: &mut RgbaImage, rect: &Rect, label: &str, fonts: &FontBook) {
    fill_rect(target, rect, color::PLACEHOLDER_FILL);
    stroke_rect(target, rect, 1.0, color::PLACEHOLDER_BORDER);
    let font_px = (rect.height * 0.2).clamp(8.0, 16.0);
    fonts.draw(
        target,
        label,
        rect,
        FontFamily::Arial,
        font_px,
        TextAlign::Center,
        color::PLACEHOLDER_TEXT,
    );
}

fn draw_stretched(target: &mut RgbaImage, image: &DynamicImage, rect: &Rect) {
    draw_scaled(target, image, rect, FilterType::Triangle);
}

/// Contain-fit `image` inside `rect`.
fn draw_contained(target: &mut RgbaImage, image: &DynamicImage, rect: &Rect) {
    let fit = fit_contain(rect.width, rect.height, image.width() as f32, image.height() as f32);
    draw_scaled(target, image, &fit.within(rect), FilterType::Lanczos3);
}

/// Scale `image` onto `placed`, resampling only the part that lands on the
/// target. The intermediate buffer is never larger than the target itself.
fn draw_scaled(target: &mut RgbaImage, image: &DynamicImage, placed: &Rect, filter: FilterType) {
    if placed.width <= 0.0 || placed.height <= 0.0 || image.width() == 0 || image.height() == 0 {
        return;
    }
    let Some((x0, y0, x1, y1)) = pixel_span(target, placed) else {
        return;
    };

    let (src_w, src_h) = (image.width() as f32, image.height() as f32);
    let scale_x = src_w / placed.width;
    let scale_y = src_h / placed.height;
    let src_x0 = ((x0 as f32 - placed.x) * scale_x).floor().clamp(0.0, src_w - 1.0) as u32;
    let src_y0 = ((y0 as f32 - placed.y) * scale_y).floor().clamp(0.0, src_h - 1.0) as u32;
    let src_x1 = ((x1 as f32 - placed.x) * scale_x).ceil().clamp(src_x0 as f32 + 1.0, src_w) as u32;
    let src_y1 = ((y1 as f32 - placed.y) * scale_y).ceil().clamp(src_y0 as f32 + 1.0, src_h) as u32;

    let visible = image.crop_imm(src_x0, src_y0, src_x1 - src_x0, src_y1 - src_y0);
    let resized = visible.resize_exact(x1 - x0, y1 - y0, filter).to_rgba8();
    imageops::overlay(target, &resized, x0 as i64, y0 as i64);
}
