use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
};
use async_trait::async_trait;

/// Key-selection surface supplied by the embedding environment.
#[async_trait]
pub trait HostCapabilities: Send + Sync {
    async fn has_selected_api_key(&self) -> bool;
    async fn open_select_key(&self) -> Result<()>;
}

/// Host for non-browser embeddings where the key comes from configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredKeyHost {
    has_key: bool,
}

impl ConfiguredKeyHost {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            has_key: config.api_key.is_some(),
        }
    }
}

#[async_trait]
impl HostCapabilities for ConfiguredKeyHost {
    async fn has_selected_api_key(&self) -> bool {
        self.has_key
    }

    async fn open_select_key(&self) -> Result<()> {
        if self.has_key {
            Ok(())
        } else {
            Err(StudioError::ConfigError(
                "No API key configured; set GEMINI_API_KEY".into(),
            ))
        }
    }
}
