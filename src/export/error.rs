//! Terminal export failures.
//!
//! Per-element degradation (an image that fails to load, a QR payload that
//! cannot be encoded) is not an error; it is reported as an
//! [`ExportWarning`](super::ExportWarning) on the finished document.

use crate::error::ParticipantError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// The upscaled composition would exceed the rasterizer's limits
    #[error("Raster of {width}x{height} exceeds the {max}px limit")]
    Raster { width: u64, height: u64, max: u32 },

    /// PDF assembly or serialization failed
    #[error("Document encoding failed: {0}")]
    Encode(String),

    /// The participant record could not be resolved
    #[error(transparent)]
    Participant(#[from] ParticipantError),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Encode(e.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Encode(e.to_string())
    }
}
