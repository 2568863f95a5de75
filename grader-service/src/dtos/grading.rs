use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct GradingResponse {
    pub success: bool,
    pub response: String,
    /// Sanitized form of the uploaded filename.
    pub pdf_filename: String,
    pub explanation: String,
    /// Characters in the trimmed extracted text.
    pub pdf_text_length: usize,
}

/// Form body of `/api/prompt_redo`. Missing fields deserialize as empty and
/// are reported by validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RevisionRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Initial feedback is required"))]
    pub initial_feedback: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Professor input is required"))]
    pub professor_input: String,
}

impl RevisionRequest {
    /// Copy with surrounding whitespace removed, so blank fields fail validation.
    pub fn trimmed(&self) -> Self {
        Self {
            initial_feedback: self.initial_feedback.trim().to_string(),
            professor_input: self.professor_input.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevisionResponse {
    pub success: bool,
    pub response: String,
    pub initial_feedback: String,
    pub professor_input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fail_after_trimming() {
        let request = RevisionRequest {
            initial_feedback: "  \n".to_string(),
            professor_input: "Looks great".to_string(),
        };

        assert!(request.validate().is_ok());
        let errors = request.trimmed().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("initial_feedback"));
        assert!(!errors.field_errors().contains_key("professor_input"));
    }
}
