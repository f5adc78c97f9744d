//! Shared types used across all modules.
//!
//! This module defines the core data structures for review requests,
//! reviews, issues, and the run-level enums. Other modules import from
//! here rather than reaching into each other's internals.

pub mod request;
pub mod review;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use request::ReviewRequest;
pub use review::{Issue, IssueType, Review, RunSummary, Severity};

/// The review focus requested for a run.
///
/// Selects which instructional template the prompt builder uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    #[default]
    Full,
    Security,
    Performance,
    Style,
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewType::Full => write!(f, "full"),
            ReviewType::Security => write!(f, "security"),
            ReviewType::Performance => write!(f, "performance"),
            ReviewType::Style => write!(f, "style"),
        }
    }
}

impl std::str::FromStr for ReviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ReviewType::Full),
            "security" => Ok(ReviewType::Security),
            "performance" => Ok(ReviewType::Performance),
            "style" => Ok(ReviewType::Style),
            other => Err(format!(
                "unsupported review type: '{other}'. Supported: full, security, performance, style"
            )),
        }
    }
}

impl ReviewType {
    /// Parse leniently: anything unrecognised falls back to `full`.
    ///
    /// Used for the run configuration surface, where a typo in a workflow
    /// file should degrade to a full review rather than abort the action.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// The natural language the model is asked to answer in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    #[default]
    En,
    Ja,
    Zh,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Ko => write!(f, "ko"),
            Language::En => write!(f, "en"),
            Language::Ja => write!(f, "ja"),
            Language::Zh => write!(f, "zh"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ko" => Ok(Language::Ko),
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            "zh" => Ok(Language::Zh),
            other => Err(format!(
                "unsupported language: '{other}'. Supported: ko, en, ja, zh"
            )),
        }
    }
}

impl Language {
    /// Parse leniently: anything unrecognised falls back to English.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// Supported LLM provider backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    Gemini,
    /// Any OpenAI-compatible API (e.g. Ollama, Together, local servers).
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Anthropic => write!(f, "anthropic"),
            ProviderName::OpenAI => write!(f, "openai"),
            ProviderName::Gemini => write!(f, "gemini"),
            ProviderName::OpenAICompatible => write!(f, "openai-compatible"),
        }
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderName::Anthropic),
            "openai" => Ok(ProviderName::OpenAI),
            "gemini" => Ok(ProviderName::Gemini),
            "openai-compatible" => Ok(ProviderName::OpenAICompatible),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: anthropic, openai, gemini, \
                 openai-compatible"
            )),
        }
    }
}

impl ProviderName {
    /// Returns the provider-specific environment variable name for the API key.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
            ProviderName::Gemini => "GEMINI_API_KEY",
        }
    }
}
