use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for literer (`config.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion model; also selects the tokenizer
    #[serde(default = "default_model")]
    pub model: String,

    /// Token budget per feedback chunk
    #[serde(default = "default_budget")]
    pub budget_tokens: usize,

    /// Paragraph delimiter used when chunking
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Completion requests in flight per loop (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub scholar: ScholarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScholarConfig {
    #[serde(default = "default_scholar_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            budget_tokens: default_budget(),
            delimiter: default_delimiter(),
            concurrency: default_concurrency(),
            openai: OpenAiConfig::default(),
            scholar: ScholarConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            base_url: default_scholar_url(),
            api_key: None,
            max_results: default_max_results(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_budget() -> usize {
    4000
}

fn default_delimiter() -> String {
    "\n\n".to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_scholar_url() -> String {
    "https://api.semanticscholar.org/graph/v1".to_string()
}

fn default_max_results() -> usize {
    30
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
        if let Some(dirs) = directories::ProjectDirs::from("com", "literer", "literer") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.literer/config.toml")
        }
    }

    /// OpenAI API key from the configured environment variable
    pub fn openai_api_key(&self) -> Option<String> {
        std::env::var(&self.openai.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn openai_timeout(&self) -> Duration {
        Duration::from_secs(self.openai.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.budget_tokens, 4000);
        assert_eq!(config.delimiter, "\n\n");
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.scholar.max_results, 30);
        assert!(config.scholar.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.budget_tokens, config.budget_tokens);
        assert_eq!(parsed.delimiter, config.delimiter);
        assert_eq!(parsed.openai.base_url, config.openai.base_url);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
model = "gpt-4"
concurrency = 4

[scholar]
api_key = "s2-key"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.budget_tokens, 4000);
        assert_eq!(config.scholar.api_key.as_deref(), Some("s2-key"));
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "budget_tokens = 2000\n[openai]\ntimeout_secs = 10\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.budget_tokens, 2000);
        assert_eq!(config.openai_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
