/// Configuration loading and validation for the suggestion engine
use crate::providers::SourceCategory;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FUZZY_CUTOFF: f32 = 0.5;
pub const DEFAULT_FUZZY_LIMIT: usize = 10;
pub const DEFAULT_RECENCY_CAPACITY: usize = 10;
/// Largest buffer, in bytes, that gets a full tree-sitter parse per scan
pub const DEFAULT_FULL_PARSE_LIMIT: usize = 4 * 1024;

/// Engine settings supplied by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Admit near-miss names in addition to prefix matches
    pub fuzzy_enabled: bool,
    /// Minimum closeness ratio for a fuzzy match
    pub fuzzy_cutoff: f32,
    /// Maximum number of fuzzy matches admitted per request
    pub fuzzy_limit: usize,
    /// Number of recently accepted names that get the recency boost
    pub recency_capacity: usize,
    /// Provider priority, highest first
    pub provider_order: Vec<SourceCategory>,
    /// Buffers longer than this many bytes are scanned with the regex sweep only
    pub full_parse_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuzzy_enabled: false,
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            fuzzy_limit: DEFAULT_FUZZY_LIMIT,
            recency_capacity: DEFAULT_RECENCY_CAPACITY,
            provider_order: SourceCategory::DEFAULT_ORDER.to_vec(),
            full_parse_limit: DEFAULT_FULL_PARSE_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn with_fuzzy(mut self, enabled: bool) -> Self {
        self.fuzzy_enabled = enabled;
        self
    }

    /// Priority index of a category (lower wins)
    pub fn priority_of(&self, category: SourceCategory) -> usize {
        self.provider_order
            .iter()
            .position(|c| *c == category)
            .unwrap_or(self.provider_order.len())
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            Some("json") => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Engine configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or JSON file, chosen by extension
    pub fn load_from_file(path: &Path) -> CompletionResult<EngineConfig> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            CompletionError::ConfigError(format!(
                "Unsupported configuration file: {}",
                path.display()
            ))
        })?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, format)
    }

    /// Load configuration from a string
    pub fn load_from_string(content: &str, format: ConfigFormat) -> CompletionResult<EngineConfig> {
        let config: EngineConfig = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate_config(&config)?;
        Ok(Self::normalize(config))
    }

    /// Validate engine configuration
    pub fn validate_config(config: &EngineConfig) -> CompletionResult<()> {
        if !(0.0..=1.0).contains(&config.fuzzy_cutoff) {
            return Err(CompletionError::ConfigError(format!(
                "fuzzy_cutoff must be within 0.0..=1.0, got {}",
                config.fuzzy_cutoff
            )));
        }

        if config.fuzzy_limit == 0 {
            return Err(CompletionError::ConfigError(
                "fuzzy_limit must be greater than zero".to_string(),
            ));
        }

        if config.recency_capacity == 0 {
            return Err(CompletionError::ConfigError(
                "recency_capacity must be greater than zero".to_string(),
            ));
        }

        for (i, category) in config.provider_order.iter().enumerate() {
            if config.provider_order[..i].contains(category) {
                return Err(CompletionError::ConfigError(format!(
                    "Provider category listed twice: {:?}",
                    category
                )));
            }
        }

        Ok(())
    }

    /// Append categories missing from `provider_order` in default order
    fn normalize(mut config: EngineConfig) -> EngineConfig {
        for category in SourceCategory::DEFAULT_ORDER {
            if !config.provider_order.contains(&category) {
                config.provider_order.push(category);
            }
        }
        config
    }
}
