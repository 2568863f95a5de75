//! Mock provider for tests and local runs without an API key.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned grading reply in the shape the grading prompts ask for.
pub const MOCK_GRADING_REPLY: &str = "Final Grade: 85/100\n\
- Clarity (34/40): The argument is easy to follow, with a few vague transitions.\n\
- Evidence (28/35): Claims are supported, but two sources are only paraphrased.\n\
- Mechanics (23/25): Minor punctuation slips in the conclusion.";

/// What the mock does on every call.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Reply with this text.
    Reply(String),
    /// Echo the prompt back, prefixed.
    Echo,
    /// Fail with an authentication error.
    FailAuthentication,
    /// Fail with a rate-limit error.
    FailRateLimited(Option<u64>),
    /// Fail with a generic API error.
    FailApi(String),
}

/// Mock text provider that records every prompt it receives.
pub struct MockTextProvider {
    behavior: MockBehavior,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .ok()
            .and_then(|prompts| prompts.last().cloned())
    }
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new(MockBehavior::Reply(MOCK_GRADING_REPLY.to_string()))
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let text = match &self.behavior {
            MockBehavior::Reply(text) => text.clone(),
            MockBehavior::Echo => format!("Mock response for: {}", prompt),
            MockBehavior::FailAuthentication => {
                return Err(ProviderError::Authentication(
                    "invalid x-api-key".to_string(),
                ))
            }
            MockBehavior::FailRateLimited(retry_after) => {
                return Err(ProviderError::RateLimited {
                    retry_after: *retry_after,
                })
            }
            MockBehavior::FailApi(msg) => return Err(ProviderError::ApiError(msg.clone())),
        };

        Ok(ProviderResponse {
            output_tokens: text.len() as u32 / 4,
            text,
            input_tokens: prompt.len() as u32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}
