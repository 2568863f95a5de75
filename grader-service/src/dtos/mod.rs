pub mod grading;
pub mod prompt;

pub use grading::{GradingResponse, RevisionRequest, RevisionResponse};
pub use prompt::PromptResponse;
