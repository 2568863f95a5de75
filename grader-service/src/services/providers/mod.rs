//! LLM provider abstractions and implementations.
//!
//! Handlers only see [`TextProvider`]; the concrete backend (Anthropic in
//! production, a mock in tests) is chosen at startup and injected through
//! the application state.

pub mod anthropic;
pub mod mock;

use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider rejected our credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited")]
    RateLimited { retry_after: Option<u64> },

    #[error("{0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Empty response from provider")]
    EmptyResponse,
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Authentication(_) => "authentication",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::ApiError(_) => "api",
            ProviderError::NetworkError(_) => "network",
            ProviderError::EmptyResponse => "empty_response",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Authentication(_) => AppError::Unauthorized(anyhow::anyhow!(
                "Authentication failed. Please check your Anthropic API key."
            )),
            ProviderError::RateLimited { retry_after } => AppError::TooManyRequests(
                "Rate limit exceeded. Please try again later.".to_string(),
                retry_after,
            ),
            other => AppError::UpstreamError(format!("Anthropic API error: {}", other)),
        }
    }
}

/// Result of a completion request.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// First text block of the reply, verbatim.
    pub text: String,

    /// Input tokens consumed.
    pub input_tokens: u32,

    /// Output tokens generated.
    pub output_tokens: u32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    Other,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::Other => "other",
        }
    }
}

/// Generation parameters for a single completion.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Maximum output tokens.
    pub max_tokens: u32,
}

/// Trait for single-turn text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Sends `prompt` as one user turn and returns the model's reply.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Model identifier, for logs and metrics.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_maps_to_unauthorized() {
        let err: AppError = ProviderError::Authentication("invalid x-api-key".into()).into();
        match err {
            AppError::Unauthorized(e) => assert!(e.to_string().contains("Anthropic API key")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn rate_limit_keeps_retry_hint() {
        let err: AppError = ProviderError::RateLimited {
            retry_after: Some(12),
        }
        .into();
        match err {
            AppError::TooManyRequests(_, retry) => assert_eq!(retry, Some(12)),
            other => panic!("Expected TooManyRequests, got {:?}", other),
        }
    }

    #[test]
    fn other_failures_carry_provider_detail() {
        let err: AppError =
            ProviderError::ApiError("overloaded_error: Overloaded".to_string()).into();
        match err {
            AppError::UpstreamError(msg) => {
                assert_eq!(msg, "Anthropic API error: overloaded_error: Overloaded")
            }
            other => panic!("Expected UpstreamError, got {:?}", other),
        }
    }
}
