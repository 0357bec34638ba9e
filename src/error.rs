//! Error types for the collaborator-facing operations.
//!
//! Geometry, model, and interaction operations never fail; only loading and
//! storing data (templates, images, participants, config) and the export
//! pipeline (see [`crate::export::ExportError`]) return errors.

use thiserror::Error;

/// Errors from the template load/save contract.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// JSON parsing or encoding failed
    #[error("Template JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading or writing a template file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally valid JSON with an unusable canvas
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

/// Errors from the binary-image load/store collaborator.
#[derive(Error, Debug)]
pub enum ImageError {
    /// No image is stored under the reference
    #[error("Image not found: {0}")]
    NotFound(String),

    /// IO error from the backing store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded as an image
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// A `data:` URL was malformed
    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    /// Upload bytes are not in a supported image format
    #[error("Unsupported image format")]
    Unsupported,

    /// The reference points outside the store root
    #[error("Reference escapes the image root: {0}")]
    OutsideRoot(String),
}

/// Errors while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from resolving a participant data record.
#[derive(Error, Debug)]
pub enum ParticipantError {
    /// No participant is registered under the id
    #[error("Unknown registration: {0}")]
    UnknownRegistration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Participant JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
