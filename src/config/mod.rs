//! Configuration loading and layering.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (the action's `INPUT_*` surface)
//! 3. `.critiq.toml` in the repo root
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env::Env;
use crate::models::{Language, ProviderName, ReviewType, Severity};

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub review: ReviewConfig,
    pub provider: ProviderConfig,
}

/// Run-level review configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub review_type: ReviewType,
    pub language: Language,
    /// Hard cap stated in each prompt, clamped to `[1, 10]`.
    pub max_issues_per_file: u8,
    /// Issues below this severity are dropped from the report — after
    /// the reviews come back, never inside the pipeline, so a review
    /// always represents the model's full judgment.
    pub severity_filter: Severity,
    /// Cap on how many changed files are reviewed per run.
    pub max_files: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            review_type: ReviewType::Full,
            language: Language::En,
            max_issues_per_file: 3,
            severity_filter: Severity::Low,
            max_files: 10,
        }
    }
}

/// LLM provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: ProviderName::Anthropic,
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads the repo-local config file if present, then applies
    /// environment variable overrides.
    pub fn load(repo_root: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(root) = repo_root {
            let local_path = root.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                config = Self::load_file(&local_path)?;
            }
        }

        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Apply environment variable overrides.
    ///
    /// The enum-valued inputs parse leniently: a typo in a workflow file
    /// degrades to the documented default instead of failing the run.
    fn apply_env_vars(&mut self, env: &Env) {
        use crate::constants as c;

        if let Ok(val) = env.var(c::ENV_REVIEW_TYPE) {
            self.review.review_type = ReviewType::parse_lenient(&val);
        }
        if let Ok(val) = env.var(c::ENV_LANGUAGE) {
            self.review.language = Language::parse_lenient(&val);
        }
        if let Ok(val) = env.var(c::ENV_MAX_ISSUES) {
            match val.parse::<u8>() {
                Ok(n) => self.review.max_issues_per_file = n.clamp(1, 10),
                Err(_) => tracing::warn!("ignoring invalid {} value: {val}", c::ENV_MAX_ISSUES),
            }
        }
        if let Ok(val) = env.var(c::ENV_SEVERITY_FILTER) {
            match val.parse::<Severity>() {
                Ok(s) => self.review.severity_filter = s,
                Err(_) => {
                    tracing::warn!("ignoring invalid {} value: {val}", c::ENV_SEVERITY_FILTER)
                }
            }
        }
        if let Ok(val) = env.var(c::ENV_MAX_FILES) {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => self.review.max_files = n,
                _ => tracing::warn!("ignoring invalid {} value: {val}", c::ENV_MAX_FILES),
            }
        }

        if let Ok(val) = env.var(c::ENV_PROVIDER) {
            match val.parse::<ProviderName>() {
                Ok(name) => self.provider.name = name,
                Err(_) => tracing::warn!("ignoring invalid {} value: {val}", c::ENV_PROVIDER),
            }
        }
        if let Ok(val) = env.var(c::ENV_MODEL) {
            self.provider.model = val;
        }
        if let Ok(val) = env.var(c::ENV_BASE_URL) {
            self.provider.base_url = Some(val);
        }

        // Action input first, then the provider-specific env var.
        let api_key = env
            .var(c::ENV_API_KEY)
            .or_else(|_| env.var(self.provider.name.api_key_env_var()))
            .ok();
        if api_key.is_some() {
            self.provider.api_key = api_key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.review.review_type, ReviewType::Full);
        assert_eq!(config.review.language, Language::En);
        assert_eq!(config.review.max_issues_per_file, 3);
        assert_eq!(config.review.severity_filter, Severity::Low);
        assert_eq!(config.review.max_files, 10);
        assert_eq!(config.provider.name, ProviderName::Anthropic);
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[review]
review_type = "security"
language = "ko"
max_issues_per_file = 5
severity_filter = "high"

[provider]
name = "openai"
model = "gpt-4o"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.review.review_type, ReviewType::Security);
        assert_eq!(config.review.language, Language::Ko);
        assert_eq!(config.review.max_issues_per_file, 5);
        assert_eq!(config.review.severity_filter, Severity::High);
        assert_eq!(config.provider.name, ProviderName::OpenAI);
        assert_eq!(config.provider.model, "gpt-4o");
    }

    #[test]
    fn load_from_repo_root() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".critiq.toml"),
            r#"
[review]
review_type = "performance"
"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.review.review_type, ReviewType::Performance);
    }

    #[test]
    fn load_without_any_config_file() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.review.review_type, ReviewType::Full);
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let result = Config::load_file(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn env_vars_override_defaults() {
        let env = Env::mock([
            ("INPUT_REVIEW_TYPE", "style"),
            ("INPUT_LANGUAGE", "ja"),
            ("INPUT_MAX_ISSUES_PER_FILE", "7"),
            ("INPUT_SEVERITY_FILTER", "medium"),
            ("INPUT_MAX_FILES", "25"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.review.review_type, ReviewType::Style);
        assert_eq!(config.review.language, Language::Ja);
        assert_eq!(config.review.max_issues_per_file, 7);
        assert_eq!(config.review.severity_filter, Severity::Medium);
        assert_eq!(config.review.max_files, 25);
    }

    #[test]
    fn invalid_enum_inputs_degrade_to_defaults() {
        let env = Env::mock([
            ("INPUT_REVIEW_TYPE", "secccurity"),
            ("INPUT_LANGUAGE", "klingon"),
            ("INPUT_SEVERITY_FILTER", "urgent"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.review.review_type, ReviewType::Full);
        assert_eq!(config.review.language, Language::En);
        assert_eq!(config.review.severity_filter, Severity::Low);
    }

    #[test]
    fn max_issues_env_is_clamped() {
        let env = Env::mock([("INPUT_MAX_ISSUES_PER_FILE", "99")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.review.max_issues_per_file, 10);
    }

    #[test]
    fn provider_env_vars() {
        let env = Env::mock([
            ("INPUT_PROVIDER", "openai"),
            ("INPUT_MODEL", "gpt-4o"),
            ("INPUT_BASE_URL", "https://custom.api/v1"),
            ("INPUT_API_KEY", "sk-env-test"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.provider.name, ProviderName::OpenAI);
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.provider.base_url, Some("https://custom.api/v1".to_string()));
        assert_eq!(config.provider.api_key, Some("sk-env-test".to_string()));
    }

    #[test]
    fn provider_specific_api_key_fallback() {
        let env = Env::mock([("ANTHROPIC_API_KEY", "sk-anthropic-test")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(
            config.provider.api_key,
            Some("sk-anthropic-test".to_string())
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = ProviderConfig::default();
        config.api_key = Some("sk-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
