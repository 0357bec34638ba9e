//! Binary image load/store.
//!
//! Backgrounds and image elements refer to their pixels through an opaque
//! [`ImageRef`]. An [`ImageStore`] turns a raw upload into a stable reference
//! and resolves references back to bytes. `data:` URLs are self-contained
//! and decode the same way for every store.

use crate::error::ImageError;
use crate::types::ImageRef;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Formats accepted by uploads.
pub const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub reference: ImageRef,
    pub format: ImageFormat,
    /// Natural pixel size
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Bytes stored under a (non-`data:`) reference.
    async fn load_bytes(&self, reference: &ImageRef) -> Result<Vec<u8>, ImageError>;

    /// Store `bytes` and return a stable reference to them.
    async fn upload(&self, bytes: Vec<u8>) -> Result<UploadedImage, ImageError>;

    /// Resolve any reference, `data:` URLs included, to raw bytes.
    async fn fetch(&self, reference: &ImageRef) -> Result<Vec<u8>, ImageError> {
        if reference.is_data_url() {
            decode_data_url(reference.as_str())
        } else {
            self.load_bytes(reference).await
        }
    }

    /// Resolve and decode.
    async fn load_image(&self, reference: &ImageRef) -> Result<DynamicImage, ImageError> {
        let bytes = self.fetch(reference).await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

/// Check that `bytes` is a supported image and read its natural size.
pub fn inspect_upload(bytes: &[u8]) -> Result<(ImageFormat, u32, u32), ImageError> {
    let format = image::guess_format(bytes).map_err(|_| ImageError::Unsupported)?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(ImageError::Unsupported);
    }
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    Ok((format, decoded.width(), decoded.height()))
}

/// Decode a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ImageError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::DataUrl("missing data: prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::DataUrl("missing payload".to_string()))?;
    if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(ImageError::DataUrl("only base64 payloads are supported".to_string()));
    }
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(payload)
        .map_err(|e| ImageError::DataUrl(e.to_string()))
}

/// Encode bytes as a `data:` URL.
pub fn encode_data_url(bytes: &[u8], format: ImageFormat) -> ImageRef {
    ImageRef::new(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

// ============================================================================
// Memory store
// ============================================================================

/// Content-addressed in-memory store.
#[derive(Default)]
pub struct MemoryImageStore {
    images: RwLock<HashMap<String, Arc<Vec<u8>>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes under a caller-chosen reference.
    pub fn insert(&self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.images.write().insert(reference.into(), Arc::new(bytes));
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn load_bytes(&self, reference: &ImageRef) -> Result<Vec<u8>, ImageError> {
        self.images
            .read()
            .get(reference.as_str())
            .map(|bytes| bytes.as_ref().clone())
            .ok_or_else(|| ImageError::NotFound(reference.to_string()))
    }

    async fn upload(&self, bytes: Vec<u8>) -> Result<UploadedImage, ImageError> {
        let (format, width, height) = inspect_upload(&bytes)?;
        let reference = format!("sha256:{}", content_hash(&bytes));
        debug!(%reference, width, height, "Stored image in memory");
        self.images
            .write()
            .entry(reference.clone())
            .or_insert_with(|| Arc::new(bytes));
        Ok(UploadedImage {
            reference: ImageRef::new(reference),
            format,
            width,
            height,
        })
    }
}

// ============================================================================
// Filesystem store
// ============================================================================

/// Images as files under one root directory. References are paths relative
/// to the root; uploads are named by content hash.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, reference: &ImageRef) -> Result<PathBuf, ImageError> {
        let relative = Path::new(reference.as_str());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || reference.as_str().is_empty() {
            return Err(ImageError::OutsideRoot(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn load_bytes(&self, reference: &ImageRef) -> Result<Vec<u8>, ImageError> {
        let path = self.resolve(reference)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ImageError::NotFound(reference.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upload(&self, bytes: Vec<u8>) -> Result<UploadedImage, ImageError> {
        let (format, width, height) = inspect_upload(&bytes)?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let name = format!("{}.{extension}", content_hash(&bytes));

        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(&name);
        if tokio::fs::try_exists(&path).await? {
            debug!(path = %path.display(), "Image already stored");
        } else {
            tokio::fs::write(&path, &bytes).await?;
            info!(path = %path.display(), width, height, "Stored image");
        }

        Ok(UploadedImage {
            reference: ImageRef::new(name),
            format,
            width,
            height,
        })
    }
}
