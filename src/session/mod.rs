pub mod analyzer;
pub mod host;
pub mod prompt_maker;
pub mod ticker;
pub mod video_studio;

pub use analyzer::{AnalyzerStatus, ImageAnalyzer, ANALYSIS_FAILED_MESSAGE};
pub use host::{ConfiguredKeyHost, HostCapabilities};
pub use prompt_maker::{PromptMaker, PromptStatus, PROMPT_FAILED_MESSAGE};
pub use ticker::{EXTENSION_PHRASES, INITIAL_PHRASES};
pub use video_studio::{GenerationMode, GenerationStatus, VideoStudio};

/// Why a screen action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    KeyNotSelected,
    Busy,
    NoImage,
    EmptyConcept,
    EmptyPrompt,
    NoPriorVideo,
}

/// Result of a user action on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed,
    Skipped(SkipReason),
    /// The session was reset while the request was in flight.
    Discarded,
}
