use crate::{
    client::{GenerationClient, PlayableMedia, VideoClient},
    clock::{Clock, TokioClock},
    error::{Result, StudioError},
    models::{ImageAsset, VideoObject, VideoResult},
    session::{
        host::HostCapabilities,
        ticker::{StatusTicker, EXTENSION_PHRASES, INITIAL_PHRASES},
        ActionOutcome, SkipReason,
    },
};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    Generating,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Initial,
    Extension,
}

impl GenerationMode {
    fn phrases(&self) -> &'static [&'static str; 4] {
        match self {
            GenerationMode::Initial => &INITIAL_PHRASES,
            GenerationMode::Extension => &EXTENSION_PHRASES,
        }
    }
}

struct SessionContext {
    key_selected: bool,
    prompt: String,
    staged_image: Option<ImageAsset>,
    last_video: Option<VideoObject>,
    playable: Option<PlayableMedia>,
    status: GenerationStatus,
    error_message: Option<String>,
    // Bumped by every start and by reset; results from an older epoch are dropped.
    epoch: u64,
    // Stays set through a reset until the dispatched operation returns.
    in_flight: bool,
    ticker: Option<AbortHandle>,
}

/// Holds the single-operation gate for one `run`, including when its future is dropped.
struct InFlight<'a> {
    studio: &'a VideoStudio,
    epoch: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut ctx = self.studio.lock();
        ctx.in_flight = false;

        if ctx.epoch == self.epoch && ctx.status == GenerationStatus::Generating {
            log::warn!("Video studio: epoch {} abandoned before completion", self.epoch);
            if let Some(ticker) = ctx.ticker.take() {
                ticker.abort();
            }
            ctx.status = GenerationStatus::Idle;
            self.studio.status.send_replace(String::new());
        }
    }
}

/// Video generation screen with chained extensions.
pub struct VideoStudio {
    client: VideoClient,
    host: Arc<dyn HostCapabilities>,
    clock: Arc<dyn Clock>,
    status_interval: Duration,
    status: Arc<watch::Sender<String>>,
    context: Mutex<SessionContext>,
}

impl VideoStudio {
    pub fn new(
        client: &GenerationClient,
        host: Arc<dyn HostCapabilities>,
        status_interval: Duration,
    ) -> Self {
        let (status, _) = watch::channel(String::new());
        Self {
            client: client.video().for_session(),
            host,
            clock: Arc::new(TokioClock),
            status_interval,
            status: Arc::new(status),
            context: Mutex::new(SessionContext {
                key_selected: false,
                prompt: String::new(),
                staged_image: None,
                last_video: None,
                playable: None,
                status: GenerationStatus::Idle,
                error_message: None,
                epoch: 0,
                in_flight: false,
                ticker: None,
            }),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionContext> {
        self.context.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queries the host for a selected key.
    pub async fn mount(&self) {
        let selected = self.host.has_selected_api_key().await;
        log::debug!("Video studio mounted, key selected: {}", selected);
        self.lock().key_selected = selected;
    }

    /// Opens the host's key picker. A completed selection is assumed to yield a key.
    pub async fn select_key(&self) -> bool {
        match self.host.open_select_key().await {
            Ok(()) => {
                self.lock().key_selected = true;
                true
            }
            Err(e) => {
                log::warn!("Key selection failed: {}", e);
                false
            }
        }
    }

    pub fn key_selected(&self) -> bool {
        self.lock().key_selected
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.lock().prompt = prompt.into();
    }

    pub fn prompt(&self) -> String {
        self.lock().prompt.clone()
    }

    pub fn stage_image(&self, image: ImageAsset) {
        self.lock().staged_image = Some(image);
    }

    pub fn clear_image(&self) {
        self.lock().staged_image = None;
    }

    pub fn has_staged_image(&self) -> bool {
        self.lock().staged_image.is_some()
    }

    pub fn mode(&self) -> GenerationMode {
        if self.lock().last_video.is_some() {
            GenerationMode::Extension
        } else {
            GenerationMode::Initial
        }
    }

    pub fn status(&self) -> GenerationStatus {
        self.lock().status
    }

    pub fn status_message(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }

    pub fn error_message(&self) -> Option<String> {
        self.lock().error_message.clone()
    }

    pub fn last_video_object(&self) -> Option<VideoObject> {
        self.lock().last_video.clone()
    }

    /// The video currently on display, if its download succeeded.
    pub fn playable_video(&self) -> Option<PlayableMedia> {
        self.lock().playable.clone().filter(|media| !media.is_empty())
    }

    /// Generates in the current mode: extends the last video when there is one.
    pub async fn generate(&self) -> ActionOutcome {
        let mode = self.mode();
        self.run(mode).await
    }

    pub async fn extend(&self) -> ActionOutcome {
        if self.mode() != GenerationMode::Extension {
            return ActionOutcome::Skipped(SkipReason::NoPriorVideo);
        }
        self.run(GenerationMode::Extension).await
    }

    async fn run(&self, mode: GenerationMode) -> ActionOutcome {
        let (epoch, prompt, image, previous, ticker) = {
            let mut ctx = self.lock();
            if !ctx.key_selected {
                return ActionOutcome::Skipped(SkipReason::KeyNotSelected);
            }
            if ctx.in_flight {
                return ActionOutcome::Skipped(SkipReason::Busy);
            }
            if ctx.prompt.trim().is_empty() {
                return ActionOutcome::Skipped(SkipReason::EmptyPrompt);
            }

            let previous = match mode {
                GenerationMode::Extension => match ctx.last_video.clone() {
                    Some(video) => Some(video),
                    None => return ActionOutcome::Skipped(SkipReason::NoPriorVideo),
                },
                GenerationMode::Initial => {
                    ctx.last_video = None;
                    None
                }
            };
            let image = match mode {
                GenerationMode::Initial => ctx.staged_image.clone(),
                GenerationMode::Extension => None,
            };

            ctx.status = GenerationStatus::Generating;
            ctx.error_message = None;
            ctx.epoch += 1;
            ctx.in_flight = true;

            let ticker = StatusTicker::start(
                mode.phrases(),
                self.status_interval,
                self.clock.clone(),
                self.status.clone(),
            );
            ctx.ticker = Some(ticker.abort_handle());

            (ctx.epoch, ctx.prompt.clone(), image, previous, ticker)
        };

        let _in_flight = InFlight { studio: self, epoch };
        log::info!("Video studio: {:?} generation started (epoch {})", mode, epoch);

        let result = match previous {
            Some(video) => self.client.extend(&prompt, &video).await,
            None => self.client.generate(&prompt, image.as_ref()).await,
        };
        let result = match result {
            Ok(video) => {
                let media = self.client.fetch_playable_media(&video.uri).await;
                Ok((video, media))
            }
            Err(e) => Err(e),
        };

        drop(ticker);
        self.finish(epoch, result)
    }

    fn finish(&self, epoch: u64, result: Result<(VideoResult, PlayableMedia)>) -> ActionOutcome {
        let mut ctx = self.lock();

        if ctx.epoch != epoch || ctx.status != GenerationStatus::Generating {
            log::info!("Video studio: discarding result of epoch {}", epoch);
            if let Ok((_, media)) = &result {
                self.client.media().revoke(media);
            }
            return ActionOutcome::Discarded;
        }

        ctx.ticker = None;
        self.status.send_replace(String::new());

        match result {
            Ok((video, media)) => {
                if let Some(previous) = ctx.playable.replace(media) {
                    self.client.media().revoke(&previous);
                }
                ctx.last_video = Some(video.video_object);
                ctx.staged_image = None;
                ctx.error_message = None;
                ctx.status = GenerationStatus::Completed;
                ActionOutcome::Completed
            }
            Err(e) => {
                log::error!("Video studio: generation failed: {}", e);
                ctx.error_message = Some(format!("Technical error: {}", e.detail()));
                ctx.status = GenerationStatus::Failed;
                ActionOutcome::Failed
            }
        }
    }

    /// Drops the chained video and returns to initial mode. The prompt is kept.
    /// An operation already dispatched keeps the studio busy until it returns.
    pub fn reset(&self) {
        let mut ctx = self.lock();

        if ctx.in_flight {
            ctx.epoch += 1;
        }
        if let Some(ticker) = ctx.ticker.take() {
            ticker.abort();
        }
        if let Some(media) = ctx.playable.take() {
            self.client.media().revoke(&media);
        }

        ctx.last_video = None;
        ctx.error_message = None;
        ctx.status = GenerationStatus::Idle;
        self.status.send_replace(String::new());

        log::info!("Video studio reset");
    }

    /// Writes the displayed video to `path`.
    pub async fn export_video(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self
            .playable_video()
            .and_then(|media| self.client.media().resolve(&media))
            .ok_or_else(|| StudioError::ValidationError("No video to export".into()))?;

        let path = path.as_ref();
        tokio::fs::write(path, &data).await.map_err(|e| {
            StudioError::ValidationError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        log::info!("Exported {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}
