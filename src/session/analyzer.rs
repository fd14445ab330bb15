use crate::{
    client::{AnalysisClient, GenerationClient},
    models::ImageAsset,
    session::{ActionOutcome, SkipReason},
};
use std::sync::{Mutex, MutexGuard};

pub const ANALYSIS_FAILED_MESSAGE: &str = "An error occurred during analysis. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerStatus {
    Idle,
    Loading,
    Report(String),
    Error(String),
}

#[derive(Debug)]
struct AnalyzerState {
    image: Option<ImageAsset>,
    instruction: String,
    status: AnalyzerStatus,
}

/// Photograph critique screen.
pub struct ImageAnalyzer {
    client: AnalysisClient,
    state: Mutex<AnalyzerState>,
}

impl ImageAnalyzer {
    pub fn new(client: &GenerationClient) -> Self {
        Self {
            client: client.analysis().clone(),
            state: Mutex::new(AnalyzerState {
                image: None,
                instruction: String::new(),
                status: AnalyzerStatus::Idle,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AnalyzerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stages a new photograph and clears the previous report.
    pub fn stage_image(&self, image: ImageAsset) {
        let mut state = self.lock();
        state.image = Some(image);
        if state.status != AnalyzerStatus::Loading {
            state.status = AnalyzerStatus::Idle;
        }
    }

    pub fn set_instruction(&self, instruction: impl Into<String>) {
        self.lock().instruction = instruction.into();
    }

    pub fn has_image(&self) -> bool {
        self.lock().image.is_some()
    }

    pub fn status(&self) -> AnalyzerStatus {
        self.lock().status.clone()
    }

    pub async fn analyze(&self) -> ActionOutcome {
        let (image, instruction) = {
            let mut state = self.lock();
            if state.status == AnalyzerStatus::Loading {
                return ActionOutcome::Skipped(SkipReason::Busy);
            }
            let image = match state.image.clone() {
                Some(image) => image,
                None => return ActionOutcome::Skipped(SkipReason::NoImage),
            };
            state.status = AnalyzerStatus::Loading;
            (image, state.instruction.clone())
        };

        let result = self.client.analyze(&image, Some(&instruction)).await;

        let mut state = self.lock();
        match result {
            Ok(report) => {
                state.status = AnalyzerStatus::Report(report);
                ActionOutcome::Completed
            }
            Err(e) => {
                log::warn!("Analysis screen error: {}", e);
                state.status = AnalyzerStatus::Error(ANALYSIS_FAILED_MESSAGE.to_string());
                ActionOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::config::GeminiConfig;
    use crate::error::StudioError;
    use crate::models::GenerateContentResponse;
    use crate::test_support::FakeGateway;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn screen(gateway: Arc<FakeGateway>) -> ImageAnalyzer {
        let client = GenerationClient::with_gateway(gateway, Arc::new(TokioClock), GeminiConfig::new());
        ImageAnalyzer::new(&client)
    }

    fn photo() -> ImageAsset {
        ImageAsset::new(vec![0xff, 0xd8, 0xff], "image/jpeg").unwrap()
    }

    #[tokio::test]
    async fn test_no_image_is_a_no_op() {
        let gateway = Arc::new(FakeGateway::new());
        let analyzer = screen(gateway.clone());

        assert_eq!(
            analyzer.analyze().await,
            ActionOutcome::Skipped(SkipReason::NoImage)
        );
        assert_eq!(analyzer.status(), AnalyzerStatus::Idle);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_report_then_new_image_clears_it() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_content(Ok(GenerateContentResponse::from_text("Strong rim light.")));
        let analyzer = screen(gateway);

        analyzer.stage_image(photo());
        analyzer.set_instruction("Evaluate skin texture detail");
        assert_eq!(analyzer.analyze().await, ActionOutcome::Completed);
        assert_eq!(
            analyzer.status(),
            AnalyzerStatus::Report("Strong rim light.".into())
        );

        analyzer.stage_image(photo());
        assert_eq!(analyzer.status(), AnalyzerStatus::Idle);
    }

    #[tokio::test]
    async fn test_failure_shows_generic_message() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.push_content(Err(StudioError::RequestError("offline".into())));
        let analyzer = screen(gateway);

        analyzer.stage_image(photo());
        assert_eq!(analyzer.analyze().await, ActionOutcome::Failed);
        assert_eq!(
            analyzer.status(),
            AnalyzerStatus::Error(ANALYSIS_FAILED_MESSAGE.into())
        );
    }

    #[tokio::test]
    async fn test_second_request_while_loading_is_ignored() {
        let gateway = Arc::new(FakeGateway::new());
        let gate = Arc::new(Notify::new());
        gateway.hold_content(gate.clone());
        gateway.push_content(Ok(GenerateContentResponse::from_text("Balanced frame.")));
        let analyzer = screen(gateway.clone());
        analyzer.stage_image(photo());

        let first = analyzer.analyze();
        let second = async {
            tokio::task::yield_now().await;
            assert_eq!(analyzer.status(), AnalyzerStatus::Loading);
            let outcome = analyzer.analyze().await;
            gate.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first, ActionOutcome::Completed);
        assert_eq!(second, ActionOutcome::Skipped(SkipReason::Busy));
        assert_eq!(gateway.content_requests().len(), 1);
    }
}
