use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the redaction engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Classifier suggestions below this confidence are ignored
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

/// How slides are sampled for the classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Decks with at most this many slides are sampled in full
    #[serde(default = "default_full_deck_max_slides")]
    pub full_deck_max_slides: usize,

    #[serde(default = "default_head_slides")]
    pub head_slides: usize,

    /// Share of the middle slides picked at random
    #[serde(default = "default_middle_ratio")]
    pub middle_ratio: f64,

    #[serde(default = "default_max_chars_per_slide")]
    pub max_chars_per_slide: usize,

    /// Fixed seed for reproducible sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            full_deck_max_slides: default_full_deck_max_slides(),
            head_slides: default_head_slides(),
            middle_ratio: default_middle_ratio(),
            max_chars_per_slide: default_max_chars_per_slide(),
            seed: None,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_confidence_threshold() -> f64 {
    0.85
}

fn default_full_deck_max_slides() -> usize {
    5
}

fn default_head_slides() -> usize {
    3
}

fn default_middle_ratio() -> f64 {
    0.2
}

fn default_max_chars_per_slide() -> usize {
    1000
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "deck-redact", "deck-redact") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.deck-redact/config.toml")
        }
    }
}
