use crate::error::{Result, StudioError};
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use std::path::Path;

/// A user-supplied picture held fully in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    data: Bytes,
    mime_type: String,
}

impl ImageAsset {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Result<Self> {
        let data = data.into();
        let mime_type = mime_type.into();

        if data.is_empty() {
            return Err(StudioError::ValidationError("Image is empty".into()));
        }
        if !mime_type.starts_with("image/") {
            return Err(StudioError::ValidationError(format!(
                "Unsupported MIME type: {}",
                mime_type
            )));
        }

        Ok(Self { data, mime_type })
    }

    /// Parses a `data:<mime>;base64,<payload>` URL as produced by browser file readers.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::ValidationError("Not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::ValidationError("Data URL has no payload".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| StudioError::ValidationError("Data URL is not base64".into()))?;

        let data = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| StudioError::ValidationError(format!("Invalid base64 payload: {}", e)))?;

        Self::new(data, mime_type)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_for_path(path).ok_or_else(|| {
            StudioError::ValidationError(format!("Unrecognised image file: {}", path.display()))
        })?;

        let data = tokio::fs::read(path).await.map_err(|e| {
            StudioError::ValidationError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::new(data, mime_type)
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };
    Some(mime)
}
