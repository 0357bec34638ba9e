//! Certificate template designer.
//!
//! A template is a fixed-size canvas with a background image and an ordered
//! list of positioned elements (static text, participant variables, images,
//! QR codes, signatures). [`editor::EditorSession`] edits one template
//! through pointer and keyboard input; [`export::ExportPipeline`] turns a
//! template snapshot plus one participant's data into a single-page PDF.
//!
//! ## Modules
//!
//! - [`geometry`] - points, rectangles, screen/canvas transforms, resize math
//! - [`types`], [`template`] - the data model and its reducers
//! - [`input`] - the pointer/keyboard interaction state machine
//! - [`render`] - display-list rendering shared by the editor and export
//! - [`export`] - content resolution, composition, PDF assembly

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod images;
pub mod input;
pub mod logging;
pub mod participant;
pub mod perf;
pub mod render;
pub mod spatial_index;
pub mod template;
pub mod types;

pub use editor::EditorSession;
pub use export::{ExportOptions, ExportPipeline, ExportWarning, ExportedDocument};
pub use template::TemplateModel;
pub use types::{CertificateElement, CertificateTemplate, ElementId, ElementType, ImageRef};
