use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_GENERATION_MODEL: &str = "veo-3.1-fast-generate-preview";
pub const DEFAULT_EXTENSION_MODEL: &str = "veo-3.1-generate-preview";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub analysis_model: String,
    pub prompt_model: String,
    pub generation_model: String,
    pub extension_model: String,
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: DEFAULT_TEXT_MODEL.to_string(),
            prompt_model: DEFAULT_TEXT_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            extension_model: DEFAULT_EXTENSION_MODEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.is_empty());
        let base_url = env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let poll_interval = env::var("GEMINI_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        GeminiConfig {
            api_key,
            base_url,
            poll_interval,
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_text_models(
        mut self,
        analysis_model: impl Into<String>,
        prompt_model: impl Into<String>,
    ) -> Self {
        self.analysis_model = analysis_model.into();
        self.prompt_model = prompt_model.into();
        self
    }

    pub fn with_video_models(
        mut self,
        generation_model: impl Into<String>,
        extension_model: impl Into<String>,
    ) -> Self {
        self.generation_model = generation_model.into();
        self.extension_model = extension_model.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    /// Cadence of the studio's rotating status phrases.
    pub status_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            status_interval: DEFAULT_STATUS_INTERVAL,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let status_interval = env::var("STUDIO_STATUS_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_STATUS_INTERVAL);

        Config {
            gemini: GeminiConfig::from_env(),
            status_interval,
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }
}
