use crate::{
    client::media::{MediaStore, PlayableMedia},
    clock::Clock,
    config::GeminiConfig,
    error::{Result, StudioError},
    gateway::Gateway,
    logger,
    models::{GenerateVideosRequest, ImageAsset, VideoObject, VideoOperation, VideoResult},
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct VideoClient {
    gateway: Arc<dyn Gateway>,
    clock: Arc<dyn Clock>,
    media: Arc<MediaStore>,
    generation_model: String,
    extension_model: String,
    poll_interval: Duration,
}

impl VideoClient {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        clock: Arc<dyn Clock>,
        media: Arc<MediaStore>,
        config: &GeminiConfig,
    ) -> Self {
        Self {
            gateway,
            clock,
            media,
            generation_model: config.generation_model.clone(),
            extension_model: config.extension_model.clone(),
            poll_interval: config.poll_interval,
        }
    }

    pub fn media(&self) -> &Arc<MediaStore> {
        &self.media
    }

    /// A copy sharing the gateway and models but owning a fresh media store.
    pub fn for_session(&self) -> Self {
        Self {
            media: Arc::new(MediaStore::new()),
            ..self.clone()
        }
    }

    pub async fn start_generation(
        &self,
        prompt: &str,
        image: Option<&ImageAsset>,
    ) -> Result<VideoOperation> {
        log::info!(
            "Starting video generation with model: {} (seed image: {})",
            self.generation_model,
            image.map_or("none", |img| img.mime_type())
        );

        let request = GenerateVideosRequest::initial(prompt, image);
        self.gateway
            .generate_videos(&self.generation_model, request)
            .await
            .map_err(|e| {
                log::error!("Video generation request failed: {}", e);
                StudioError::GenerationError(e.to_string())
            })
    }

    pub async fn start_extension(
        &self,
        prompt: &str,
        previous: &VideoObject,
    ) -> Result<VideoOperation> {
        log::info!("Starting video extension with model: {}", self.extension_model);

        let request = GenerateVideosRequest::extension(prompt, previous.clone());
        self.gateway
            .generate_videos(&self.extension_model, request)
            .await
            .map_err(|e| {
                log::error!("Video extension request failed: {}", e);
                StudioError::GenerationError(e.to_string())
            })
    }

    /// Polls until the operation is done. An operation that is already done is
    /// never polled.
    pub async fn await_completion(&self, operation: VideoOperation) -> Result<VideoResult> {
        let _timer = logger::timer(&format!("Video operation {}", operation.name));
        let mut operation = operation;
        let mut polls = 0u32;

        while !operation.done {
            self.clock.sleep(self.poll_interval).await;
            polls += 1;
            log::debug!("Polling {} (attempt {})", operation.name, polls);

            operation = self.gateway.get_operation(&operation).await.map_err(|e| {
                log::error!("Polling {} failed: {}", operation.name, e);
                StudioError::GenerationError(e.to_string())
            })?;
        }

        Self::extract_result(&operation)
    }

    fn extract_result(operation: &VideoOperation) -> Result<VideoResult> {
        if let Some(error) = &operation.error {
            log::error!("Operation {} failed: {}", operation.name, error);
            return Err(StudioError::GenerationError(error.to_string()));
        }

        let video = operation
            .first_video()
            .ok_or_else(|| StudioError::GenerationError("no video produced".into()))?;
        let uri = video
            .uri()
            .ok_or_else(|| StudioError::GenerationError("generated video has no URI".into()))?;

        log::info!("Operation {} produced {}", operation.name, uri);
        Ok(VideoResult {
            uri: uri.to_string(),
            video_object: video.clone(),
        })
    }

    /// Downloads the video and registers it as an object URL. Failures are
    /// logged and yield the empty handle.
    pub async fn fetch_playable_media(&self, uri: &str) -> PlayableMedia {
        match self.gateway.fetch_media(uri).await {
            Ok(data) => {
                log::info!("Downloaded {} bytes of video", data.len());
                self.media.create_object_url(data)
            }
            Err(e) => {
                let err = StudioError::MediaFetchError(e.detail());
                log::error!("{}", err);
                PlayableMedia::empty()
            }
        }
    }

    pub async fn generate(&self, prompt: &str, image: Option<&ImageAsset>) -> Result<VideoResult> {
        let operation = self.start_generation(prompt, image).await?;
        self.await_completion(operation).await
    }

    pub async fn extend(&self, prompt: &str, previous: &VideoObject) -> Result<VideoResult> {
        let operation = self.start_extension(prompt, previous).await?;
        self.await_completion(operation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationState;
    use crate::test_support::{video_object, FakeGateway, RecordingClock};
    use bytes::Bytes;
    use serde_json::json;

    fn client(gateway: Arc<FakeGateway>, clock: Arc<RecordingClock>) -> VideoClient {
        VideoClient::new(
            gateway,
            clock,
            Arc::new(MediaStore::new()),
            &GeminiConfig::new(),
        )
    }

    #[tokio::test]
    async fn test_polls_at_fixed_cadence_until_done() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_poll(Ok(VideoOperation::pending("op-1")));
        gateway.push_poll(Ok(VideoOperation::pending("op-1")));
        gateway.push_poll(Ok(VideoOperation::succeeded("op-1", vec![video_object("https://v/1")])));
        let clock = Arc::new(RecordingClock::new());
        let client = client(gateway.clone(), clock.clone());

        let result = client
            .await_completion(VideoOperation::pending("op-1"))
            .await
            .unwrap();

        assert_eq!(result.uri, "https://v/1");
        assert_eq!(result.video_object, video_object("https://v/1"));
        assert_eq!(gateway.poll_count(), 3);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(10); 3]);
    }

    #[tokio::test]
    async fn test_already_done_operation_is_not_polled() {
        let gateway = Arc::new(FakeGateway::new());
        let clock = Arc::new(RecordingClock::new());
        let client = client(gateway.clone(), clock.clone());

        let done = VideoOperation::succeeded("op-2", vec![video_object("https://v/2")]);
        assert_eq!(done.state(), OperationState::Succeeded);
        let result = client.await_completion(done).await.unwrap();

        assert_eq!(result.uri, "https://v/2");
        assert_eq!(gateway.poll_count(), 0);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_error_payload_stops_polling() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_poll(Ok(VideoOperation::failed(
            "op-3",
            json!({ "code": "RESOURCE_EXHAUSTED" }),
        )));
        gateway.push_poll(Ok(VideoOperation::pending("op-3")));
        let clock = Arc::new(RecordingClock::new());
        let client = client(gateway.clone(), clock.clone());

        let err = client
            .await_completion(VideoOperation::pending("op-3"))
            .await
            .unwrap_err();

        match err {
            StudioError::GenerationError(msg) => {
                assert_eq!(msg, r#"{"code":"RESOURCE_EXHAUSTED"}"#)
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(gateway.poll_count(), 1);
        assert_eq!(clock.sleeps().len(), 1);
    }

    #[tokio::test]
    async fn test_done_without_videos_is_an_error() {
        let gateway = Arc::new(FakeGateway::new());
        let client = client(gateway, Arc::new(RecordingClock::new()));

        let err = client
            .await_completion(VideoOperation::succeeded("op-4", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.detail(), "no video produced");
    }

    #[tokio::test]
    async fn test_poll_transport_failure_is_terminal() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_poll(Err(StudioError::RequestError("timed out".into())));
        gateway.push_poll(Ok(VideoOperation::succeeded("op-5", vec![video_object("https://v/5")])));
        let client = client(gateway.clone(), Arc::new(RecordingClock::new()));

        let err = client
            .await_completion(VideoOperation::pending("op-5"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::GenerationError(_)));
        assert_eq!(gateway.poll_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_and_extend_requests() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_start(Ok(VideoOperation::succeeded("op-6", vec![video_object("https://v/6")])));
        gateway.push_start(Ok(VideoOperation::succeeded("op-7", vec![video_object("https://v/7")])));
        let client = client(gateway.clone(), Arc::new(RecordingClock::new()));

        let seed = ImageAsset::new(vec![1, 2, 3], "image/png").unwrap();
        let first = client.generate("a singer on stage", Some(&seed)).await.unwrap();
        client.extend("second chorus", &first.video_object).await.unwrap();

        let requests = gateway.video_requests();
        assert_eq!(requests.len(), 2);

        let (model, initial) = &requests[0];
        assert_eq!(model, "veo-3.1-fast-generate-preview");
        assert_eq!(initial.instances[0].image.as_ref().unwrap().mime_type, "image/png");
        assert!(initial.instances[0].video.is_none());

        let (model, extension) = &requests[1];
        assert_eq!(model, "veo-3.1-generate-preview");
        assert_eq!(extension.instances[0].prompt, "second chorus");
        assert_eq!(extension.instances[0].video, Some(first.video_object));
        assert!(extension.instances[0].image.is_none());
    }

    #[tokio::test]
    async fn test_start_failure_is_a_generation_error() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_start(Err(StudioError::Gateway {
            status: 400,
            body: "bad prompt".into(),
        }));
        let client = client(gateway, Arc::new(RecordingClock::new()));

        let err = client.start_generation("x", None).await.unwrap_err();
        assert!(matches!(err, StudioError::GenerationError(_)));
    }

    #[tokio::test]
    async fn test_session_copies_keep_separate_media() {
        let gateway = Arc::new(FakeGateway::new());
        let client = client(gateway, Arc::new(RecordingClock::new()));
        let first = client.for_session();
        let second = client.for_session();

        let media = first.fetch_playable_media("https://v/10").await;
        assert_eq!(first.media().len(), 1);
        assert!(second.media().resolve(&media).is_none());
        assert!(client.media().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_playable_media() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_media(Ok(Bytes::from_static(b"mp4-bytes")));
        gateway.push_media(Err(StudioError::MediaFetchError("403".into())));
        let client = client(gateway.clone(), Arc::new(RecordingClock::new()));

        let media = client.fetch_playable_media("https://v/8").await;
        assert!(!media.is_empty());
        assert_eq!(
            client.media().resolve(&media),
            Some(Bytes::from_static(b"mp4-bytes"))
        );

        let failed = client.fetch_playable_media("https://v/9").await;
        assert!(failed.is_empty());
        assert_eq!(gateway.media_requests(), vec!["https://v/8", "https://v/9"]);
    }
}
