//! HTTP handlers for the grader service.

pub mod docs;
pub mod extract;
pub mod grading;
pub mod health;
pub mod metrics;
pub mod prompt;

pub use docs::api_docs;
pub use grading::{prompt_initial, prompt_redo};
pub use health::health_check;
pub use metrics::metrics_endpoint;
pub use prompt::prompt;

use crate::services::metrics::{
    record_llm_request, record_provider_error, record_provider_latency, record_tokens,
};
use crate::services::providers::{GenerationParams, ProviderResponse};
use crate::startup::AppState;
use service_core::error::AppError;
use std::time::Instant;

/// Sends one prompt to the configured provider and records the outcome.
/// `operation` labels logs and metrics.
async fn complete(
    state: &AppState,
    operation: &'static str,
    prompt: &str,
) -> Result<ProviderResponse, AppError> {
    let provider = &state.text_provider;
    let model = provider.model().to_string();
    let params = GenerationParams {
        max_tokens: state.config.anthropic.max_tokens,
    };

    let started = Instant::now();
    let result = provider.generate(prompt, &params).await;
    let elapsed = started.elapsed().as_secs_f64();
    record_provider_latency(&model, elapsed);

    match result {
        Ok(response) => {
            record_tokens(&model, response.input_tokens, response.output_tokens);
            record_llm_request(operation, &model, response.finish_reason.as_str());
            tracing::info!(
                operation,
                model = %model,
                prompt_len = prompt.len(),
                response_len = response.text.len(),
                finish_reason = response.finish_reason.as_str(),
                elapsed_secs = elapsed,
                "Completion succeeded"
            );
            Ok(response)
        }
        Err(e) => {
            record_provider_error(&model, e.kind());
            tracing::warn!(
                operation,
                model = %model,
                error_type = e.kind(),
                error = %e,
                "Completion failed"
            );
            Err(e.into())
        }
    }
}
