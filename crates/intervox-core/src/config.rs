use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{IntervoxError, Result};

/// Default remote completion endpoint (Hugging Face inference API).
pub const DEFAULT_ENDPOINT_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/blenderbot-400M-distill";

/// Top-level configuration for the Intervox assistant.
///
/// Loaded from `~/.intervox/config.toml` by default. Each section corresponds
/// to one subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervoxConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reply: ReplyConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl IntervoxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: IntervoxConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| IntervoxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Response resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// Remote text-generation endpoint URL.
    pub endpoint_url: String,
    /// Request timeout for the remote endpoint, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Playback rate. 1.0 is normal speed.
    pub rate: f32,
    /// Playback pitch. 1.0 is normal pitch.
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// Conversation session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay before the one-shot proactive suggestion, in milliseconds.
    pub nudge_delay_ms: u64,
    /// Delay between the two scripted human-handoff messages, in milliseconds.
    pub handoff_delay_ms: u64,
    /// Whether the session starts with playback muted.
    pub start_muted: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nudge_delay_ms: 10_000,
            handoff_delay_ms: 3_000,
            start_muted: false,
        }
    }
}
