use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Gateway returned {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("Analysis error: {0}")]
    AnalysisError(String),

    #[error("Enhancement error: {0}")]
    EnhancementError(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Media fetch error: {0}")]
    MediaFetchError(String),
}

impl StudioError {
    /// Detail text without the variant prefix, used for user-facing messages.
    pub fn detail(&self) -> String {
        match self {
            StudioError::ConfigError(msg)
            | StudioError::ValidationError(msg)
            | StudioError::RequestError(msg)
            | StudioError::ResponseError(msg)
            | StudioError::SerializationError(msg)
            | StudioError::AnalysisError(msg)
            | StudioError::EnhancementError(msg)
            | StudioError::GenerationError(msg)
            | StudioError::MediaFetchError(msg) => msg.clone(),
            StudioError::Gateway { .. } => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
