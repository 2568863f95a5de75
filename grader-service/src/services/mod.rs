pub mod extraction;
pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod upload;

pub use extraction::{extract_text, ExtractedText, ExtractionError};
pub use metrics::{get_metrics, init_metrics};
