use crate::{
    error::{Result, StudioError},
    gateway::Gateway,
    models::{GenerateContentRequest, Part},
};
use std::sync::Arc;

pub const LIP_SYNC_INSTRUCTION: &str = "You are an expert Performance Director for AI video. \
Transform lyrics or a singing concept into a technical video generation prompt. Focus on:
- Precise lip-syncing and phoneme matching (O-shapes, A-shapes, dental fricatives).
- Realistic facial muscle movements and jaw dynamics.
- Micro-expressions in the eyes that match the emotional intensity of the song.
- Professional cinematic lighting that highlights the mouth and skin textures.
- Mention 'high-fidelity facial animation' and 'perfectly synchronized mouth movements'.";

pub const CINEMATIC_INSTRUCTION: &str = "Transform this concept into a highly detailed cinematic video prompt. \
Focus on camera movement, professional lighting, and visual textures.";

const ENHANCE_TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct PromptClient {
    gateway: Arc<dyn Gateway>,
    model: String,
}

impl PromptClient {
    pub fn new(gateway: Arc<dyn Gateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    pub fn instruction_for(lip_sync: bool) -> &'static str {
        if lip_sync {
            LIP_SYNC_INSTRUCTION
        } else {
            CINEMATIC_INSTRUCTION
        }
    }

    pub fn build_request(concept: &str, lip_sync: bool) -> GenerateContentRequest {
        GenerateContentRequest::new(vec![Part::text(format!("Concept: \"{}\"", concept))])
            .with_system_instruction(Self::instruction_for(lip_sync))
            .with_temperature(ENHANCE_TEMPERATURE)
    }

    /// Rewrites a concept into a video prompt. Falls back to the concept when
    /// the gateway answers without text.
    pub async fn enhance(&self, concept: &str, lip_sync: bool) -> Result<String> {
        let request = Self::build_request(concept, lip_sync);

        log::info!(
            "Enhancing {} prompt with model: {}",
            if lip_sync { "lip-sync" } else { "cinematic" },
            self.model
        );

        let response = self
            .gateway
            .generate_content(&self.model, request)
            .await
            .map_err(|e| {
                log::error!("Prompt enhancement failed: {}", e);
                StudioError::EnhancementError(e.to_string())
            })?;

        Ok(response.text().unwrap_or_else(|| {
            log::warn!("Prompt enhancement returned no text, keeping the concept");
            concept.to_string()
        }))
    }
}
