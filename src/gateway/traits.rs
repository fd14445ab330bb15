use crate::{
    error::Result,
    models::{GenerateContentRequest, GenerateContentResponse, GenerateVideosRequest, VideoOperation},
};
use async_trait::async_trait;
use bytes::Bytes;

/// Remote inference service reached by the generation clients.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;

    /// Starts a long-running video job and returns its first snapshot.
    async fn generate_videos(
        &self,
        model: &str,
        request: GenerateVideosRequest,
    ) -> Result<VideoOperation>;

    async fn get_operation(&self, operation: &VideoOperation) -> Result<VideoOperation>;

    /// Downloads media content, authenticating through the URI query string.
    async fn fetch_media(&self, uri: &str) -> Result<Bytes>;
}
