//! Pure geometry for the designer canvas.
//!
//! Canvas space is the template's native pixel grid (origin at the top-left
//! of the certificate). Screen space is where pointer events arrive; the two
//! are related by the viewport's zoom and pan offset:
//!
//! ```text
//! screen = canvas * zoom + pan
//! canvas = (screen - pan) / zoom
//! ```
//!
//! Nothing here fails. Callers validate zoom (> 0) and sizes before calling.

use crate::constants::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use serde::{Deserialize, Serialize};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates to be non-negative.
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        Self::new(self.x.max(0.0), self.y.max(0.0))
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Shrink by `amount` on every side. Never produces a negative size.
    pub fn inset(&self, amount: f32) -> Rect {
        let width = (self.width - amount * 2.0).max(0.0);
        let height = (self.height - amount * 2.0).max(0.0);
        Rect::new(self.x + amount, self.y + amount, width, height)
    }

    /// Map a canvas-space rectangle to screen space.
    pub fn to_screen(&self, zoom: f32, pan: Point) -> Rect {
        let origin = to_screen(self.origin(), zoom, pan);
        Rect::new(origin.x, origin.y, self.width * zoom, self.height * zoom)
    }
}

// ============================================================================
// Viewport mapping
// ============================================================================

/// Canvas point to screen point.
#[inline]
pub fn to_screen(point: Point, zoom: f32, pan: Point) -> Point {
    Point::new(point.x * zoom + pan.x, point.y * zoom + pan.y)
}

/// Screen point to canvas point.
#[inline]
pub fn to_canvas(point: Point, zoom: f32, pan: Point) -> Point {
    Point::new((point.x - pan.x) / zoom, (point.y - pan.y) / zoom)
}

/// Screen-space delta to canvas-space delta (drag and resize deltas).
#[inline]
pub fn delta_to_canvas(delta: Point, zoom: f32) -> Point {
    Point::new(delta.x / zoom, delta.y / zoom)
}

/// Zoom and pan used for on-screen display. Never persisted with a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: crate::constants::DEFAULT_ZOOM,
            pan: Point::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(zoom: f32, pan: Point) -> Self {
        Self { zoom, pan }
    }

    /// Pure scaling, no pan. Used for offscreen rasterization.
    pub fn scaled(zoom: f32) -> Self {
        Self {
            zoom,
            pan: Point::ZERO,
        }
    }

    #[inline]
    pub fn to_screen(&self, point: Point) -> Point {
        to_screen(point, self.zoom, self.pan)
    }

    #[inline]
    pub fn to_canvas(&self, point: Point) -> Point {
        to_canvas(point, self.zoom, self.pan)
    }

    #[inline]
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        rect.to_screen(self.zoom, self.pan)
    }
}

// ============================================================================
// Resize handles
// ============================================================================

/// One of the four corner handles drawn around the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
    ];

    /// The corner of `rect` this handle sits on.
    pub fn anchor_on(self, rect: &Rect) -> Point {
        match self {
            ResizeHandle::Nw => Point::new(rect.x, rect.y),
            ResizeHandle::Ne => Point::new(rect.right(), rect.y),
            ResizeHandle::Sw => Point::new(rect.x, rect.bottom()),
            ResizeHandle::Se => Point::new(rect.right(), rect.bottom()),
        }
    }

    /// The corner that stays fixed while this handle is dragged.
    pub fn opposite(self) -> ResizeHandle {
        match self {
            ResizeHandle::Nw => ResizeHandle::Se,
            ResizeHandle::Ne => ResizeHandle::Sw,
            ResizeHandle::Sw => ResizeHandle::Ne,
            ResizeHandle::Se => ResizeHandle::Nw,
        }
    }

    #[inline]
    fn moves_left_edge(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw)
    }

    #[inline]
    fn moves_top_edge(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne)
    }
}

/// Apply a canvas-space pointer delta to `start` through `handle`.
///
/// The edges not owned by the handle stay put: for `sw`/`nw` the right edge
/// is anchored, for `ne`/`nw` the bottom edge is anchored. Width and height
/// never drop below the element minimum and the origin never goes negative;
/// when the origin would cross zero, the moving edge stops at zero and the
/// size absorbs the difference so the anchored edge still does not move.
pub fn compute_resize(handle: ResizeHandle, delta_x: f32, delta_y: f32, start: Rect) -> Rect {
    let (x, width) = if handle.moves_left_edge() {
        let right = start.right();
        let width = (start.width - delta_x).max(MIN_ELEMENT_WIDTH);
        let x = right - width;
        if x < 0.0 { (0.0, right.max(MIN_ELEMENT_WIDTH)) } else { (x, width) }
    } else {
        (start.x.max(0.0), (start.width + delta_x).max(MIN_ELEMENT_WIDTH))
    };

    let (y, height) = if handle.moves_top_edge() {
        let bottom = start.bottom();
        let height = (start.height - delta_y).max(MIN_ELEMENT_HEIGHT);
        let y = bottom - height;
        if y < 0.0 { (0.0, bottom.max(MIN_ELEMENT_HEIGHT)) } else { (y, height) }
    } else {
        (start.y.max(0.0), (start.height + delta_y).max(MIN_ELEMENT_HEIGHT))
    };

    Rect::new(x, y, width, height)
}

// ============================================================================
// Contain fit
// ============================================================================

/// Placement of an image scaled to fit inside a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainFit {
    pub draw_w: f32,
    pub draw_h: f32,
    /// Offset of the drawn image from the box origin.
    pub draw_x: f32,
    pub draw_y: f32,
}

impl ContainFit {
    /// Absolute placement of the fit inside `bounds`.
    pub fn within(&self, bounds: &Rect) -> Rect {
        Rect::new(
            bounds.x + self.draw_x,
            bounds.y + self.draw_y,
            self.draw_w,
            self.draw_h,
        )
    }
}

/// Scale a `natural_w × natural_h` image to fit inside `box_w × box_h`,
/// preserving aspect ratio, centered on the leftover axis.
pub fn fit_contain(box_w: f32, box_h: f32, natural_w: f32, natural_h: f32) -> ContainFit {
    if box_w <= 0.0 || box_h <= 0.0 || natural_w <= 0.0 || natural_h <= 0.0 {
        return ContainFit {
            draw_w: 0.0,
            draw_h: 0.0,
            draw_x: box_w.max(0.0) / 2.0,
            draw_y: box_h.max(0.0) / 2.0,
        };
    }

    let scale = (box_w / natural_w).min(box_h / natural_h);
    let draw_w = natural_w * scale;
    let draw_h = natural_h * scale;

    ContainFit {
        draw_w,
        draw_h,
        draw_x: (box_w - draw_w) / 2.0,
        draw_y: (box_h - draw_h) / 2.0,
    }
}
