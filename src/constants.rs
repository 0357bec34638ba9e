//! Editor-wide constants.
//!
//! Centralizes the limits and layout values shared by the model, the
//! interaction engine, the renderer, and the export pipeline.

// ============================================================================
// Element Limits
// ============================================================================

/// Minimum element width in canvas pixels
pub const MIN_ELEMENT_WIDTH: f32 = 50.0;

/// Minimum element height in canvas pixels
pub const MIN_ELEMENT_HEIGHT: f32 = 30.0;

/// Smallest allowed text size
pub const MIN_FONT_SIZE: f32 = 8.0;

/// Largest allowed text size
pub const MAX_FONT_SIZE: f32 = 72.0;

/// Offset applied to a duplicated element, on both axes
pub const DUPLICATE_OFFSET: f32 = 20.0;

// ============================================================================
// Element Defaults
// ============================================================================

/// Default size of a new static or variable text element
pub const DEFAULT_TEXT_SIZE: (f32, f32) = (200.0, 40.0);

/// Default size of a new image element
pub const DEFAULT_IMAGE_SIZE: (f32, f32) = (150.0, 150.0);

/// Default size of a new QR code element
pub const DEFAULT_QR_SIZE: (f32, f32) = (100.0, 100.0);

/// Default size of a new signature element
pub const DEFAULT_SIGNATURE_SIZE: (f32, f32) = (200.0, 80.0);

/// Default position of newly added elements
pub const DEFAULT_ELEMENT_POSITION: (f32, f32) = (50.0, 50.0);

/// Default text size
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Default text color
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Default literal content of a new static text element
pub const DEFAULT_STATIC_TEXT: &str = "Sample Text";

// ============================================================================
// Canvas
// ============================================================================

/// Default canvas width (A4 landscape proportions)
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;

/// Default canvas height (A4 landscape proportions)
pub const DEFAULT_CANVAS_HEIGHT: u32 = 566;

/// Default grid spacing in canvas pixels
pub const DEFAULT_GRID_SPACING: f32 = 20.0;

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum zoom level
pub const MIN_ZOOM: f32 = 0.1;

/// Maximum zoom level
pub const MAX_ZOOM: f32 = 3.0;

/// Default zoom level
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Zoom step for the discrete zoom in/out actions
pub const ZOOM_STEP: f32 = 0.1;

// ============================================================================
// Handles
// ============================================================================

/// Side length of a corner resize handle, in screen pixels
pub const HANDLE_SIZE: f32 = 10.0;

// ============================================================================
// Export
// ============================================================================

/// Minimum raster upscale factor for the background layer
pub const MIN_RASTER_SCALE: u32 = 3;

/// Padding between an element's box and its directly overlaid image
pub const OVERLAY_PADDING: f32 = 4.0;
