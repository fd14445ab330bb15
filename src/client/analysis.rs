use crate::{
    error::{Result, StudioError},
    gateway::Gateway,
    models::{GenerateContentRequest, ImageAsset, Part},
};
use std::sync::Arc;

pub const DEFAULT_ANALYSIS_INSTRUCTION: &str = "Analyze this image in detail focusing on composition, lighting, and facial anatomy for high-fidelity video source use.";

#[derive(Clone)]
pub struct AnalysisClient {
    gateway: Arc<dyn Gateway>,
    model: String,
}

impl AnalysisClient {
    pub fn new(gateway: Arc<dyn Gateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    pub fn build_request(image: &ImageAsset, instruction: Option<&str>) -> GenerateContentRequest {
        let instruction = instruction
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_ANALYSIS_INSTRUCTION);

        GenerateContentRequest::new(vec![Part::image(image), Part::text(instruction)])
    }

    /// Critiques a photograph; an empty reply counts as a failure.
    pub async fn analyze(&self, image: &ImageAsset, instruction: Option<&str>) -> Result<String> {
        let request = Self::build_request(image, instruction);

        log::info!(
            "Analyzing {} image ({} bytes) with model: {}",
            image.mime_type(),
            image.len(),
            self.model
        );

        let response = self
            .gateway
            .generate_content(&self.model, request)
            .await
            .map_err(|e| {
                log::error!("Image analysis failed: {}", e);
                StudioError::AnalysisError(e.to_string())
            })?;

        response.text().ok_or_else(|| {
            log::warn!("Image analysis returned no text");
            StudioError::AnalysisError("No analysis generated".into())
        })
    }
}
