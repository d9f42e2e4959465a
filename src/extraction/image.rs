//! Document image loading
//!
//! Images are sent to the vision model inline as base64 `data:` URLs, so
//! they are size-checked before being read into memory.

use crate::errors::{KycError, Result};
use base64::{engine::general_purpose, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest image accepted by default (20 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// An image file loaded for extraction
#[derive(Debug, Clone)]
pub struct DocumentImage {
    path: PathBuf,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

impl DocumentImage {
    /// Load an image from disk, rejecting files over `max_bytes`
    pub fn load(path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_type_for(path).ok_or_else(|| {
            KycError::ImageError(format!("Unsupported image type: {}", path.display()))
        })?;

        let size = fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(KycError::ImageError(format!(
                "{} is {} bytes; images must be at most {} bytes",
                path.display(),
                size,
                max_bytes
            )));
        }

        let bytes = fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded document image");

        Ok(Self {
            path: path.to_path_buf(),
            mime_type,
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Image bytes as standard base64
    pub fn base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:` URL for multimodal chat messages
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

/// MIME type for a supported image extension
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Supported image files directly inside `dir`, sorted by path
pub fn collect_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && mime_type_for(&path).is_some() {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}
