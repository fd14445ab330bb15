use crate::{
    client::GenerationClient,
    config::Config,
    session::{HostCapabilities, ImageAnalyzer, PromptMaker, VideoStudio},
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analyzer,
    PromptMaker,
    Generator,
}

/// Composes the three screens and tracks which one is active.
pub struct Shell {
    analyzer: ImageAnalyzer,
    prompt_maker: PromptMaker,
    studio: VideoStudio,
    active: Mutex<Tab>,
}

impl Shell {
    pub fn new(client: &GenerationClient, host: Arc<dyn HostCapabilities>, config: &Config) -> Self {
        Self::with_studio(client, VideoStudio::new(client, host, config.status_interval))
    }

    pub fn with_studio(client: &GenerationClient, studio: VideoStudio) -> Self {
        Self {
            analyzer: ImageAnalyzer::new(client),
            prompt_maker: PromptMaker::new(client),
            studio,
            active: Mutex::new(Tab::default()),
        }
    }

    pub fn analyzer(&self) -> &ImageAnalyzer {
        &self.analyzer
    }

    pub fn prompt_maker(&self) -> &PromptMaker {
        &self.prompt_maker
    }

    pub fn studio(&self) -> &VideoStudio {
        &self.studio
    }

    pub fn active_tab(&self) -> Tab {
        *self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn select_tab(&self, tab: Tab) {
        log::debug!("Switching to {:?}", tab);
        *self.active.lock().unwrap_or_else(|e| e.into_inner()) = tab;
    }

    /// Hands the enhanced prompt to the video studio and opens it.
    /// Returns false when no enhanced prompt is ready.
    pub fn use_prompt(&self) -> bool {
        match self.prompt_maker.enhanced_prompt() {
            Some(prompt) => {
                self.studio.set_prompt(prompt);
                self.select_tab(Tab::Generator);
                true
            }
            None => false,
        }
    }
}
