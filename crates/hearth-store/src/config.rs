//! TOML configuration: lexicon overrides and the remote completion client.
//!
//! ```toml
//! [completion]
//! api_key = "sk-..."
//! model = "gpt-3.5-turbo"
//! timeout_secs = 10
//!
//! [lexicon]
//! intensity_words = ["very", "очень", "ужасно"]
//! ```
//!
//! Every table is optional; anything omitted keeps the built-in default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hearth_core::Lexicon;

use crate::error::{Result, StoreError};

pub const CONFIG_FILE: &str = "hearth.toml";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CompletionConfig {
    /// Remote completion is used only with a non-blank key.
    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub lexicon: Lexicon,
    pub completion: CompletionConfig,
}

impl EngineConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// An explicit path must exist. Otherwise `data_dir/hearth.toml` is used
    /// when present, else the defaults.
    pub fn resolve(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = data_dir.join(CONFIG_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// A non-blank `key` replaces the configured API key.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.completion.api_key = Some(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::parse("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.completion.enabled());
        assert_eq!(config.completion.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::parse(
            r#"
            [completion]
            api_key = "sk-test"
            timeout_secs = 3

            [lexicon]
            intensity_words = ["очень"]
            "#,
        )
        .unwrap();
        assert!(config.completion.enabled());
        assert_eq!(config.completion.model, DEFAULT_MODEL);
        assert_eq!(config.completion.timeout_secs, 3);
        assert_eq!(config.lexicon.intensity_words, vec!["очень".to_string()]);
        assert_eq!(
            config.lexicon.risk_keywords,
            Lexicon::default().risk_keywords
        );
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = EngineConfig::parse("[completion\nmodel = 1").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_resolve_precedence() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            EngineConfig::resolve(None, dir.path()).unwrap(),
            EngineConfig::default()
        );

        fs::write(
            dir.path().join(CONFIG_FILE),
            "[completion]\nmodel = \"local-model\"\n",
        )
        .unwrap();
        let config = EngineConfig::resolve(None, dir.path()).unwrap();
        assert_eq!(config.completion.model, "local-model");

        let missing = dir.path().join("nope.toml");
        assert!(EngineConfig::resolve(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_api_key_override() {
        let config = EngineConfig::default().with_api_key(Some("sk-env".to_string()));
        assert_eq!(config.completion.api_key.as_deref(), Some("sk-env"));

        let config = config.with_api_key(Some("   ".to_string()));
        assert_eq!(config.completion.api_key.as_deref(), Some("sk-env"));
    }
}
