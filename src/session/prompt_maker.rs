use crate::{
    client::{GenerationClient, PromptClient},
    session::{ActionOutcome, SkipReason},
};
use std::sync::{Mutex, MutexGuard};

pub const PROMPT_FAILED_MESSAGE: &str = "Prompt enhancement failed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStatus {
    Idle,
    Loading,
    Ready(String),
    Failed(String),
}

#[derive(Debug)]
struct PromptState {
    concept: String,
    lip_sync: bool,
    status: PromptStatus,
}

/// Prompt authoring screen.
pub struct PromptMaker {
    client: PromptClient,
    state: Mutex<PromptState>,
}

impl PromptMaker {
    pub fn new(client: &GenerationClient) -> Self {
        Self {
            client: client.prompt().clone(),
            state: Mutex::new(PromptState {
                concept: String::new(),
                lip_sync: false,
                status: PromptStatus::Idle,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PromptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_concept(&self, concept: impl Into<String>) {
        self.lock().concept = concept.into();
    }

    pub fn concept(&self) -> String {
        self.lock().concept.clone()
    }

    pub fn set_lip_sync(&self, enabled: bool) {
        self.lock().lip_sync = enabled;
    }

    pub fn toggle_lip_sync(&self) -> bool {
        let mut state = self.lock();
        state.lip_sync = !state.lip_sync;
        state.lip_sync
    }

    pub fn lip_sync(&self) -> bool {
        self.lock().lip_sync
    }

    pub fn status(&self) -> PromptStatus {
        self.lock().status.clone()
    }

    /// The prompt ready for hand-off to the video studio.
    pub fn enhanced_prompt(&self) -> Option<String> {
        match &self.lock().status {
            PromptStatus::Ready(prompt) => Some(prompt.clone()),
            _ => None,
        }
    }

    pub async fn enhance(&self) -> ActionOutcome {
        let (concept, lip_sync) = {
            let mut state = self.lock();
            if state.status == PromptStatus::Loading {
                return ActionOutcome::Skipped(SkipReason::Busy);
            }
            if state.concept.trim().is_empty() {
                return ActionOutcome::Skipped(SkipReason::EmptyConcept);
            }
            state.status = PromptStatus::Loading;
            (state.concept.clone(), state.lip_sync)
        };

        let result = self.client.enhance(&concept, lip_sync).await;

        let mut state = self.lock();
        match result {
            Ok(prompt) => {
                state.status = PromptStatus::Ready(prompt);
                ActionOutcome::Completed
            }
            Err(e) => {
                log::warn!("Prompt screen error: {}", e);
                state.status = PromptStatus::Failed(PROMPT_FAILED_MESSAGE.to_string());
                ActionOutcome::Failed
            }
        }
    }
}
