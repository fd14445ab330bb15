use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

const OBJECT_URL_PREFIX: &str = "blob:";

/// Locally dereferenceable handle for downloaded media.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayableMedia {
    url: String,
}

impl PlayableMedia {
    /// Sentinel for media that could not be fetched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// Session-scoped registry of object URLs, in the manner of a browser's blob store.
#[derive(Debug, Default)]
pub struct MediaStore {
    entries: Mutex<HashMap<String, Bytes>>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&self, data: Bytes) -> PlayableMedia {
        let url = format!("{}{}", OBJECT_URL_PREFIX, Uuid::new_v4());
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.clone(), data);
        PlayableMedia { url }
    }

    pub fn resolve(&self, media: &PlayableMedia) -> Option<Bytes> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(media.url())
            .cloned()
    }

    pub fn revoke(&self, media: &PlayableMedia) {
        if media.is_empty() {
            return;
        }
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(media.url());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
