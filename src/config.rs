//! Configuration file management for partmatch
//!
//! Values live in ~/.partmatch/config.toml and can be overridden by
//! environment variables. Everything is resolved once into [`AppConfig`],
//! which the CLI hands to each stage.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::DEFAULT_COLLECTION_NAME;
use crate::embedding::{EmbeddingConfig, EmbeddingProvider};
use crate::env::{apis as env_apis, embedding as env_embedding, llm as env_llm};
use crate::error::PartMatchError;
use crate::services::google_ai::{GoogleAiConfig, DEFAULT_BASE_URL, DEFAULT_GENERATION_MODEL};
use crate::services::llm::LlmConfig;

pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_MAX_RETRIES: usize = 3;
pub const MAX_LLM_TIMEOUT_SECS: u64 = 3600;
pub const MAX_LLM_RETRIES: usize = 10;

/// Keys accepted by `config get|set|unset`
pub const CONFIG_KEYS: &[&str] = &[
    "google-ai-api-key",
    "embedding.provider",
    "embedding.model",
    "llm.model",
    "llm.timeout-secs",
    "llm.max-retries",
    "pipeline.collection-name",
];

/// Configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub embedding: EmbeddingSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_ai_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmbeddingSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LlmSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PipelineSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

impl Config {
    /// Get the config file path (~/.partmatch/config.toml)
    pub fn get_config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        Ok(home_dir.join(".partmatch").join("config.toml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from `path`, or defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        // The file may hold an API key: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions).with_context(|| {
                format!("Failed to set permissions on config file: {}", path.display())
            })?;
        }

        Ok(())
    }

    /// Get a config value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "google-ai-api-key" => self.api.google_ai_api_key.clone(),
            "embedding.provider" => self.embedding.provider.clone(),
            "embedding.model" => self.embedding.model.clone(),
            "llm.model" => self.llm.model.clone(),
            "llm.timeout-secs" => self.llm.timeout_secs.map(|v| v.to_string()),
            "llm.max-retries" => self.llm.max_retries.map(|v| v.to_string()),
            "pipeline.collection-name" => self.pipeline.collection_name.clone(),
            _ => None,
        }
    }

    /// Set a config value by key, validating typed values
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match normalize_key(key).as_str() {
            "google-ai-api-key" => self.api.google_ai_api_key = Some(value),
            "embedding.provider" => {
                let provider: EmbeddingProvider =
                    value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                self.embedding.provider = Some(provider.to_string());
            }
            "embedding.model" => self.embedding.model = Some(value),
            "llm.model" => self.llm.model = Some(value),
            "llm.timeout-secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout: {value}"))?;
                self.llm.timeout_secs = Some(check_timeout_secs(secs).map_err(anyhow::Error::msg)?);
            }
            "llm.max-retries" => {
                let retries: usize = value
                    .parse()
                    .with_context(|| format!("Invalid retry count: {value}"))?;
                self.llm.max_retries = Some(check_max_retries(retries).map_err(anyhow::Error::msg)?);
            }
            "pipeline.collection-name" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Collection name must not be empty");
                }
                self.pipeline.collection_name = Some(value);
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Unset (remove) a config value by key
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match normalize_key(key).as_str() {
            "google-ai-api-key" => self.api.google_ai_api_key = None,
            "embedding.provider" => self.embedding.provider = None,
            "embedding.model" => self.embedding.model = None,
            "llm.model" => self.llm.model = None,
            "llm.timeout-secs" => self.llm.timeout_secs = None,
            "llm.max-retries" => self.llm.max_retries = None,
            "pipeline.collection-name" => self.pipeline.collection_name = None,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// All set values as key-value pairs, with API keys masked
    pub fn list(&self) -> Vec<(String, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| {
                self.get(key).map(|value| {
                    let shown = if *key == "google-ai-api-key" {
                        mask_api_key(&value)
                    } else {
                        value
                    };
                    (key.to_string(), shown)
                })
            })
            .collect()
    }
}

fn check_timeout_secs(secs: u64) -> std::result::Result<u64, String> {
    if (1..=MAX_LLM_TIMEOUT_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(format!(
            "LLM timeout must be between 1 and {MAX_LLM_TIMEOUT_SECS} seconds, got {secs}"
        ))
    }
}

fn check_max_retries(retries: usize) -> std::result::Result<usize, String> {
    if retries <= MAX_LLM_RETRIES {
        Ok(retries)
    } else {
        Err(format!(
            "LLM retries must be at most {MAX_LLM_RETRIES}, got {retries}"
        ))
    }
}

/// Accept `snake_case` and `kebab-case` spellings, and the bare api key name
fn normalize_key(key: &str) -> String {
    let key = key.trim().to_lowercase().replace('_', "-");
    match key.as_str() {
        "api.google-ai-api-key" => "google-ai-api-key".to_string(),
        _ => key,
    }
}

/// Mask API key for display (show first 4 and last 4 characters)
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub google_ai_api_key: Option<String>,
    pub google_ai_base_url: String,
    pub embedding: EmbeddingConfig,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: usize,
    pub collection_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            google_ai_api_key: None,
            google_ai_base_url: DEFAULT_BASE_URL.to_string(),
            embedding: EmbeddingConfig::default(),
            llm_model: DEFAULT_GENERATION_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            llm_max_retries: DEFAULT_LLM_MAX_RETRIES,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve from the config file and process environment
    pub fn load() -> crate::error::Result<Self> {
        let file = Config::load().map_err(|e| PartMatchError::invalid_config(format!("{e:#}")))?;
        Self::resolve(&file, |name| std::env::var(name).ok())
    }

    /// Merge `file` with variables from `env`. Non-empty variables win.
    pub fn resolve<F>(file: &Config, env: F) -> crate::error::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let provider_name = var(env_embedding::PROVIDER).or_else(|| file.embedding.provider.clone());
        let provider = match provider_name {
            Some(name) => name
                .parse::<EmbeddingProvider>()
                .map_err(PartMatchError::invalid_config)?,
            None => EmbeddingProvider::default(),
        };

        // A model stored for another provider would not parse for this one
        let file_model_applies = match &file.embedding.provider {
            Some(name) => name.parse::<EmbeddingProvider>().ok() == Some(provider),
            None => provider == EmbeddingProvider::default(),
        };
        let mut embedding = EmbeddingConfig::new(provider);
        embedding.model = var(env_embedding::MODEL).or_else(|| {
            file.embedding
                .model
                .clone()
                .filter(|_| file_model_applies)
        });

        let llm_timeout_secs = match var(env_llm::TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                PartMatchError::invalid_config(format!(
                    "{} must be a number of seconds, got '{raw}'",
                    env_llm::TIMEOUT
                ))
            })?,
            None => file.llm.timeout_secs.unwrap_or(defaults.llm_timeout_secs),
        };
        let llm_timeout_secs =
            check_timeout_secs(llm_timeout_secs).map_err(PartMatchError::invalid_config)?;
        let llm_max_retries = check_max_retries(
            file.llm.max_retries.unwrap_or(defaults.llm_max_retries),
        )
        .map_err(PartMatchError::invalid_config)?;

        Ok(Self {
            google_ai_api_key: var(env_apis::GOOGLE_AI_API_KEY)
                .or_else(|| file.api.google_ai_api_key.clone()),
            google_ai_base_url: var(env_apis::GOOGLE_AI_BASE_URL)
                .unwrap_or(defaults.google_ai_base_url),
            embedding,
            llm_model: var(env_llm::MODEL)
                .or_else(|| file.llm.model.clone())
                .unwrap_or(defaults.llm_model),
            llm_timeout_secs,
            llm_max_retries,
            collection_name: file
                .pipeline
                .collection_name
                .clone()
                .unwrap_or(defaults.collection_name),
        })
    }

    pub fn with_embedding_provider(mut self, provider: EmbeddingProvider) -> Self {
        if self.embedding.provider != provider {
            self.embedding = EmbeddingConfig::new(provider);
        }
        self
    }

    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    pub fn has_google_ai_api_key(&self) -> bool {
        self.google_ai_api_key.is_some()
    }

    /// Credentials and endpoint for the Google AI embedder, if a key is set
    pub fn google_ai_config(&self) -> Option<GoogleAiConfig> {
        self.google_ai_api_key.as_ref().map(|key| {
            GoogleAiConfig::new(key.clone())
                .with_base_url(self.google_ai_base_url.clone())
                .with_timeout(Duration::from_secs(self.llm_timeout_secs))
                .with_max_retries(self.llm_max_retries)
        })
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            model: self.llm_model.clone(),
            base_url: self.google_ai_base_url.clone(),
            timeout_secs: self.llm_timeout_secs,
            max_retries: self.llm_max_retries,
            api_key: self.google_ai_api_key.clone(),
        }
    }

    /// Fail early when a stage that will run has no credentials
    pub fn validate(&self, explain: bool) -> crate::error::Result<()> {
        if self.collection_name.trim().is_empty() {
            return Err(PartMatchError::invalid_config(
                "collection name must not be empty",
            ));
        }

        let needs_key = explain || self.embedding.provider.requires_api_key();
        if needs_key && !self.has_google_ai_api_key() {
            return Err(PartMatchError::invalid_config(format!(
                "{} is not set. Run `partmatch config set google-ai-api-key <KEY>`, \
                 use --no-explain with --embedding hashing, or export the variable",
                env_apis::GOOGLE_AI_API_KEY
            )));
        }

        Ok(())
    }
}
