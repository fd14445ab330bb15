pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod models;
pub mod session;
pub mod shell;

#[cfg(test)]
mod test_support;

pub use client::{AnalysisClient, GenerationClient, MediaStore, PlayableMedia, PromptClient, VideoClient};
pub use clock::{Clock, TokioClock};
pub use config::{Config, GeminiConfig};
pub use error::{Result, StudioError};
pub use gateway::{Gateway, RestGateway};
pub use models::{ImageAsset, VideoObject, VideoOperation, VideoResult};
pub use session::{
    ActionOutcome, AnalyzerStatus, ConfiguredKeyHost, GenerationMode, GenerationStatus,
    HostCapabilities, ImageAnalyzer, PromptMaker, PromptStatus, SkipReason, VideoStudio,
};
pub use shell::{Shell, Tab};
