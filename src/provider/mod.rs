//! ModelProvider trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core to decouple the pipeline
//! from the specific LLM library, and to let tests drive the pipeline
//! with canned responses.

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the model provider.
///
/// Transport failures are surfaced as-is to the per-file caller and are
/// never retried here: a per-file failure must not block sibling files,
/// and deciding to skip is the caller's job.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// One model invocation's parameters.
///
/// `max_tokens` is sized by the orchestrator from the issue budget;
/// `temperature` stays low to favour determinism over creativity.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u64,
    pub temperature: f64,
    pub system: String,
    pub prompt: String,
}

/// Trait for LLM completion backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send one completion request and return the raw response text.
    ///
    /// The response is free-form text expected (but not guaranteed) to
    /// contain embedded JSON; interpreting it is the pipeline's job.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// Classifies a provider error into a short, human-readable reason.
///
/// Used to describe transport failures inside fallback reviews. Matches
/// HTTP status codes commonly used for rate limiting and temporary
/// unavailability plus connection/timeout errors.
pub fn classify_error(err: &ProviderError) -> &'static str {
    match err {
        ProviderError::ApiError(msg) => {
            let msg_lower = msg.to_lowercase();
            if msg_lower.contains("429")
                || msg_lower.contains("rate limit")
                || msg_lower.contains("too many requests")
            {
                "the model API rate-limited the request"
            } else if msg_lower.contains("401") || msg_lower.contains("unauthorized") {
                "the model API rejected the credentials"
            } else if msg_lower.contains("503")
                || msg_lower.contains("service unavailable")
                || msg_lower.contains("529")
                || msg_lower.contains("overloaded")
            {
                "the model API is overloaded"
            } else if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
                "the model API request timed out"
            } else if msg_lower.contains("connection") {
                "could not connect to the model API"
            } else {
                "the model API call failed"
            }
        }
        ProviderError::NotConfigured(_) => "the model provider is not configured",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_rate_limit() {
        let err = ProviderError::ApiError("HTTP 429 Too Many Requests".into());
        assert_eq!(classify_error(&err), "the model API rate-limited the request");
    }

    #[test]
    fn classify_auth() {
        let err = ProviderError::ApiError("Invalid API key: 401 Unauthorized".into());
        assert_eq!(
            classify_error(&err),
            "the model API rejected the credentials"
        );
    }

    #[test]
    fn classify_overloaded() {
        let err = ProviderError::ApiError("status 529: overloaded".into());
        assert_eq!(classify_error(&err), "the model API is overloaded");
    }

    #[test]
    fn classify_timeout() {
        let err = ProviderError::ApiError("request timed out after 30s".into());
        assert_eq!(classify_error(&err), "the model API request timed out");
    }

    #[test]
    fn classify_connection() {
        let err = ProviderError::ApiError("connection refused".into());
        assert_eq!(classify_error(&err), "could not connect to the model API");
    }

    #[test]
    fn classify_unknown_api_error() {
        let err = ProviderError::ApiError("something odd".into());
        assert_eq!(classify_error(&err), "the model API call failed");
    }

    #[test]
    fn classify_not_configured() {
        let err = ProviderError::NotConfigured("missing key".into());
        assert_eq!(classify_error(&err), "the model provider is not configured");
    }
}
