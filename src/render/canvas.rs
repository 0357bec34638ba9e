//! Canvas rendering - background, grid, elements, selection and handles.
//!
//! [`render_scene`] is a pure function of `(template, selection, viewport,
//! ghost, options)` producing a flat display list in paint order. The editor
//! paints it every frame; the export pipeline builds the same list at the
//! raster scale with editor chrome turned off, so what is exported is what
//! was designed.
//!
//! ## Performance Notes
//!
//! During a drag or resize the element under the gesture is laid out from
//! the ghost override, so repainting never needs a model commit.
//! Elements entirely outside the surface are culled.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use super::color;
use crate::constants::{DEFAULT_GRID_SPACING, HANDLE_SIZE, OVERLAY_PADDING};
use crate::geometry::{Point, Rect, ResizeHandle, Size, Viewport};
use crate::input::GhostOverride;
use crate::profile_scope;
use crate::types::{CertificateElement, CertificateTemplate, ElementId, ElementKind, ImageRef, TextStyle};
use image::Rgba;

/// Which layers a scene carries.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub show_grid: bool,
    pub grid_spacing: f32,
    /// Paint selection outline and handles
    pub show_selection: bool,
    /// Paint placeholders for image-like elements without a loaded image
    pub show_placeholders: bool,
    /// Paint variable text as `{{key}}` instead of its content
    pub show_variable_keys: bool,
    /// Inset of image content inside its element box, canvas pixels
    pub image_padding: f32,
    /// Output surface; defaults to the extent of the canvas on screen
    pub surface: Option<Size>,
}

impl RenderOptions {
    /// Interactive editor: placeholders, keys and selection chrome.
    pub fn editor() -> Self {
        Self {
            show_grid: false,
            grid_spacing: DEFAULT_GRID_SPACING,
            show_selection: true,
            show_placeholders: true,
            show_variable_keys: true,
            image_padding: OVERLAY_PADDING,
            surface: None,
        }
    }

    /// Offscreen export composition: content only.
    pub fn export() -> Self {
        Self {
            show_grid: false,
            grid_spacing: DEFAULT_GRID_SPACING,
            show_selection: false,
            show_placeholders: false,
            show_variable_keys: false,
            image_padding: OVERLAY_PADDING,
            surface: None,
        }
    }

    pub fn with_grid(mut self, enabled: bool, spacing: f32) -> Self {
        self.show_grid = enabled && spacing > 0.0;
        self.grid_spacing = spacing;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::editor()
    }
}

/// One paint operation. Rectangles are in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Fill {
        rect: Rect,
        color: Rgba<u8>,
    },
    /// Background image stretched over the canvas
    Background {
        rect: Rect,
        reference: ImageRef,
    },
    GridLine {
        rect: Rect,
    },
    Text {
        element_id: ElementId,
        rect: Rect,
        text: String,
        style: TextStyle,
        /// Font size in surface pixels
        font_px: f32,
    },
    /// Image content, contain-fit inside `rect` minus `padding`
    Image {
        element_id: ElementId,
        rect: Rect,
        padding: f32,
        /// Drawn when the image is not available
        fallback: Option<&'static str>,
    },
    Placeholder {
        element_id: ElementId,
        rect: Rect,
        label: String,
    },
    SelectionOutline {
        rect: Rect,
    },
    Handle {
        handle: ResizeHandle,
        rect: Rect,
    },
}

impl SceneNode {
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            SceneNode::Text { element_id, .. }
            | SceneNode::Image { element_id, .. }
            | SceneNode::Placeholder { element_id, .. } => Some(element_id),
            _ => None,
        }
    }
}

/// Display list for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Size,
    pub clear: Rgba<u8>,
    /// Canvas rectangle on the surface
    pub canvas: Rect,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn nodes_for<'a>(&'a self, id: &'a ElementId) -> impl Iterator<Item = &'a SceneNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.element_id() == Some(id))
    }

    pub fn handles(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node, SceneNode::Handle { .. }))
    }

    /// Text runs in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            SceneNode::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Build the display list for `template` as seen through `viewport`.
pub fn render_scene(
    template: &CertificateTemplate,
    selection: Option<&ElementId>,
    viewport: &Viewport,
    ghost: Option<&GhostOverride>,
    options: &RenderOptions,
) -> Scene {
    profile_scope!("render_scene");

    let canvas = viewport.rect_to_screen(&template.canvas_rect());
    let size = options
        .surface
        .unwrap_or_else(|| Size::new(canvas.right().max(0.0).ceil(), canvas.bottom().max(0.0).ceil()));
    let surface = Rect::new(0.0, 0.0, size.width, size.height);

    let mut nodes = Vec::with_capacity(template.elements.len() * 2 + 8);
    nodes.push(SceneNode::Fill {
        rect: canvas,
        color: color::PAGE,
    });
    if let Some(reference) = &template.background_reference {
        nodes.push(SceneNode::Background {
            rect: canvas,
            reference: reference.clone(),
        });
    }
    if options.show_grid {
        push_grid(&mut nodes, template, viewport, options.grid_spacing);
    }

    let bounds_of = |element: &CertificateElement| match ghost {
        Some(g) if g.element_id == element.id => g.bounds,
        _ => element.bounds(),
    };

    for element in &template.elements {
        let rect = viewport.rect_to_screen(&bounds_of(element));
        if !intersects(&rect, &surface) {
            continue;
        }
        push_element(&mut nodes, element, rect, viewport.zoom, options);
    }

    if options.show_selection {
        if let Some(element) = selection.and_then(|id| template.element(id)) {
            let rect = viewport.rect_to_screen(&bounds_of(element));
            nodes.push(SceneNode::SelectionOutline { rect });
            let half = HANDLE_SIZE / 2.0;
            for handle in ResizeHandle::ALL {
                let corner = handle.anchor_on(&rect);
                nodes.push(SceneNode::Handle {
                    handle,
                    rect: Rect::new(corner.x - half, corner.y - half, HANDLE_SIZE, HANDLE_SIZE),
                });
            }
        }
    }

    Scene {
        size,
        clear: if options.show_selection {
            color::WORKSPACE
        } else {
            color::PAGE
        },
        canvas,
        nodes,
    }
}

fn push_element(
    nodes: &mut Vec<SceneNode>,
    element: &CertificateElement,
    rect: Rect,
    zoom: f32,
    options: &RenderOptions,
) {
    let element_id = element.id.clone();
    match &element.kind {
        ElementKind::StaticText { content, style } => {
            if !content.is_empty() {
                nodes.push(SceneNode::Text {
                    element_id,
                    rect,
                    text: content.clone(),
                    style: style.clone(),
                    font_px: style.font_size * zoom,
                });
            }
        }
        ElementKind::VariableText {
            variable_key,
            content,
            style,
        } => {
            let text = if options.show_variable_keys {
                format!("{{{{{variable_key}}}}}")
            } else {
                content.clone()
            };
            if !text.is_empty() {
                nodes.push(SceneNode::Text {
                    element_id,
                    rect,
                    text,
                    style: style.clone(),
                    font_px: style.font_size * zoom,
                });
            }
        }
        ElementKind::Image { image_reference } | ElementKind::Signature { image_reference } => {
            push_image(nodes, element, element_id, rect, zoom, image_reference.is_some(), options);
        }
        ElementKind::QrCode {
            image_reference,
            data,
        } => {
            // Generated codes only exist at export time.
            let available = image_reference.is_some() || (data.is_some() && !options.show_placeholders);
            push_image(nodes, element, element_id, rect, zoom, available, options);
        }
    }
}

fn push_image(
    nodes: &mut Vec<SceneNode>,
    element: &CertificateElement,
    element_id: ElementId,
    rect: Rect,
    zoom: f32,
    available: bool,
    options: &RenderOptions,
) {
    let label = element.element_type().placeholder_label();
    if available {
        nodes.push(SceneNode::Image {
            element_id,
            rect,
            padding: options.image_padding * zoom,
            fallback: options.show_placeholders.then_some(label),
        });
    } else if options.show_placeholders {
        nodes.push(SceneNode::Placeholder {
            element_id,
            rect,
            label: label.to_string(),
        });
    }
}

fn push_grid(nodes: &mut Vec<SceneNode>, template: &CertificateTemplate, viewport: &Viewport, spacing: f32) {
    if spacing <= 0.0 {
        return;
    }
    let (width, height) = (template.canvas_width as f32, template.canvas_height as f32);
    let mut x = spacing;
    while x < width {
        let top = viewport.to_screen(Point::new(x, 0.0));
        nodes.push(SceneNode::GridLine {
            rect: Rect::new(top.x, top.y, 1.0, height * viewport.zoom),
        });
        x += spacing;
    }
    let mut y = spacing;
    while y < height {
        let left = viewport.to_screen(Point::new(0.0, y));
        nodes.push(SceneNode::GridLine {
            rect: Rect::new(left.x, left.y, width * viewport.zoom, 1.0),
        });
        y += spacing;
    }
}

#[inline]
fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x <= b.right() && a.right() >= b.x && a.y <= b.bottom() && a.bottom() >= b.y
}
