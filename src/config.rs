use anyhow::{Context, Result};
use serde::Deserialize;

use crate::engine::AsrOptions;
use crate::session::SessionConfig;

/// Connection settings for the ASR server. The defaults match a stock
/// server installation running from the Docker image.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// URL of the streaming ASR server.
    pub server_url: String,

    /// Client ID to authenticate as.
    pub client_id: String,

    /// Access token for the client ID. A default installation uses a
    /// common token; individual-token setups need the matching one.
    pub access_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:20741".to_string(),
            client_id: "any".to_string(),
            access_token: "test1234".to_string(),
        }
    }
}

/// Recognition options resolved against the server at configuration time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AsrConfig {
    /// Negotiated recognition language (BCP 47 tag).
    pub language: String,

    /// Task hint for selecting a model without knowing its exact name.
    pub task: String,

    /// Exact model name. Leave empty when `language` is set.
    pub model: String,

    /// Whether the server should stream continuous results.
    pub continuous: bool,

    /// Convert numbers and ordinals expressed as words in final results
    /// (one -> 1, third -> 3rd).
    pub optimize_final_result: bool,

    /// Engine-specific options passed through unchanged.
    pub engine_options: serde_json::Map<String, serde_json::Value>,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            task: String::new(),
            model: String::new(),
            continuous: true,
            optimize_final_result: true,
            engine_options: serde_json::Map::new(),
        }
    }
}

/// Top-level configuration, resolved once before a session is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub asr: AsrConfig,

    /// Phrase list handed to the engine at capture-start time.
    pub phrases: Vec<String>,

    /// Hot-word list handed to the engine at capture-start time.
    pub hot_words: Vec<String>,

    /// Milliseconds to wait for a final result after audio capture ends.
    /// Unset keeps the built-in delay; zero disables the wait entirely.
    pub fallback_delay_ms: Option<u64>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Resolve a per-session configuration from these settings.
    pub fn session_config(&self) -> SessionConfig {
        let asr = AsrOptions {
            server_url: self.server.server_url.clone(),
            client_id: self.server.client_id.clone(),
            access_token: self.server.access_token.clone(),
            language: self.asr.language.clone(),
            task: self.asr.task.clone(),
            model: self.asr.model.clone(),
            continuous: self.asr.continuous,
            optimize_final_result: self.asr.optimize_final_result,
            engine_options: crate::engine::EngineOptions {
                phrases: Vec::new(),
                hot_words: Vec::new(),
                extra: self.asr.engine_options.clone(),
            },
        };

        let mut session = SessionConfig {
            language: self.asr.language.clone(),
            negotiated_language: self.asr.language.clone(),
            continuous: self.asr.continuous,
            asr,
            phrases: self.phrases.clone(),
            hot_words: self.hot_words.clone(),
            ..SessionConfig::default()
        };
        if let Some(ms) = self.fallback_delay_ms {
            session.fallback_delay = std::time::Duration::from_millis(ms);
        }
        session
    }
}
