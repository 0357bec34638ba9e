//! Rendering - display lists and their rasterization.
//!
//! - `canvas` - pure scene building from template, selection and viewport
//! - `raster` - painting a scene into an RGBA bitmap
//! - `text` - font faces, line layout and glyph painting
//! - `color` - palette and hex color parsing

pub mod canvas;
pub mod color;
pub mod raster;
pub mod text;

pub use canvas::{RenderOptions, Scene, SceneNode, render_scene};
pub use raster::{ImageSet, rasterize_scene};
pub use text::FontBook;
