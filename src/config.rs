//! Configuration for discovery, extraction, scoring and summarisation.
//!
//! Every section uses `#[serde(default)]`, so a config file only needs the
//! keys it changes.

use crate::error::{CredenceError, Result};
use crate::scorer::ScoringWeights;
use crate::types::QueryFormulation;
use credence_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted when `summary.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredenceConfig {
    pub discovery: DiscoveryConfig,
    pub search: SearchConfig,
    pub extraction: ExtractionConfig,
    pub pipeline: PipelineConfig,
    pub scoring: ScoringConfig,
    pub summary: SummaryConfig,
}

/// Source discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Default number of unique URLs to collect per query.
    pub max_results: usize,
    /// Query formulations, issued in order.
    pub formulations: Vec<QueryFormulation>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            formulations: QueryFormulation::DEFAULT_SET.to_vec(),
        }
    }
}

/// Content extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Time budget for fetch plus extraction of one URL.
    pub timeout_seconds: u64,
    /// Characters of text kept per source.
    pub max_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            max_chars: 1500,
        }
    }
}

/// Analysis pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Worker tasks analysing candidates concurrently.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Credibility scoring settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Replacement domain-authority table. Uses the built-in table if unset.
    pub authority_table: Option<PathBuf>,
    pub weights: ScoringWeights,
}

/// Summarisation API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Summaries are produced only when enabled and an API key is available.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API, without `/v1`.
    pub base_url: String,
    pub model: String,
    /// API key. Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".into(),
            model: "gpt-4o".into(),
            api_key: None,
            timeout_seconds: 20,
        }
    }
}

impl SummaryConfig {
    /// The configured key, or the environment fallback. Blank keys count as unset.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl CredenceConfig {
    /// Check values that would make a query run meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`CredenceError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.discovery.max_results == 0 {
            return Err(CredenceError::Config(
                "discovery.max_results must be greater than 0".into(),
            ));
        }
        if self.discovery.formulations.is_empty() {
            return Err(CredenceError::Config(
                "discovery.formulations must not be empty".into(),
            ));
        }
        if self.extraction.timeout_seconds == 0 {
            return Err(CredenceError::Config(
                "extraction.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.extraction.max_chars == 0 {
            return Err(CredenceError::Config(
                "extraction.max_chars must be greater than 0".into(),
            ));
        }
        if self.pipeline.workers == 0 {
            return Err(CredenceError::Config(
                "pipeline.workers must be greater than 0".into(),
            ));
        }
        if self.summary.timeout_seconds == 0 {
            return Err(CredenceError::Config(
                "summary.timeout_seconds must be greater than 0".into(),
            ));
        }
        self.scoring.weights.validate().map_err(CredenceError::Config)?;
        self.search
            .validate()
            .map_err(|e| CredenceError::Config(format!("search: {e}")))?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CredenceError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CredenceError::Config`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CredenceError::Config(e.to_string()))
    }

    /// Returns the default config file path: `~/.config/credence/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("credence").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("credence")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/credence-config/config.toml")
        }
    }

    /// Load from `path`, or the default path if it exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded, or an
    /// existing default file does not parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
