pub mod analysis;
pub mod media;
pub mod prompt;
pub mod video;

use crate::{
    clock::{Clock, TokioClock},
    config::GeminiConfig,
    error::Result,
    gateway::{Gateway, RestGateway},
};
use std::sync::Arc;

pub use analysis::{AnalysisClient, DEFAULT_ANALYSIS_INSTRUCTION};
pub use media::{MediaStore, PlayableMedia};
pub use prompt::PromptClient;
pub use video::VideoClient;

/// Entry point bundling the analysis, prompt and video clients over one gateway.
#[derive(Clone)]
pub struct GenerationClient {
    analysis_client: AnalysisClient,
    prompt_client: PromptClient,
    video_client: VideoClient,
}

impl GenerationClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let gateway = Arc::new(RestGateway::new(&config)?);
        Ok(Self::with_gateway(gateway, Arc::new(TokioClock), config))
    }

    pub fn with_gateway(
        gateway: Arc<dyn Gateway>,
        clock: Arc<dyn Clock>,
        config: GeminiConfig,
    ) -> Self {
        Self {
            analysis_client: AnalysisClient::new(gateway.clone(), config.analysis_model.clone()),
            prompt_client: PromptClient::new(gateway.clone(), config.prompt_model.clone()),
            video_client: VideoClient::new(gateway, clock, Arc::new(MediaStore::new()), &config),
        }
    }

    pub fn analysis(&self) -> &AnalysisClient {
        &self.analysis_client
    }

    pub fn prompt(&self) -> &PromptClient {
        &self.prompt_client
    }

    pub fn video(&self) -> &VideoClient {
        &self.video_client
    }
}
