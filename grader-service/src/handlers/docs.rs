use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Static description of the HTTP surface.
pub async fn api_docs() -> impl IntoResponse {
    Json(json!({
        "message": "Grader service with Anthropic integration",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/prompt": "Send a message to the Anthropic API",
            "POST /api/prompt_initial": "Grade an uploaded PDF assignment",
            "POST /api/prompt_redo": "Revise earlier grading feedback using professor input",
            "GET /api/health": "Health check endpoint",
            "GET /metrics": "Prometheus metrics",
            "GET /": "This documentation"
        },
        "usage": {
            "POST /api/prompt": {
                "content_type": "application/json",
                "body": { "message": "Your string input here" },
                "response": {
                    "success": true,
                    "response": "The model's response",
                    "input_message": "Your original message"
                }
            },
            "POST /api/prompt_initial": {
                "content_type": "multipart/form-data",
                "fields": {
                    "pdf_file": "PDF file (.pdf only, max 16 MiB)",
                    "explanation": "How the assignment should be graded"
                },
                "response": {
                    "success": true,
                    "response": "Final Grade: XX/100 followed by per-criterion feedback",
                    "pdf_filename": "Sanitized uploaded filename",
                    "explanation": "Your explanation",
                    "pdf_text_length": "Characters of text extracted from the PDF"
                }
            },
            "POST /api/prompt_redo": {
                "content_type": "application/x-www-form-urlencoded or multipart/form-data",
                "fields": {
                    "initial_feedback": "The response returned by /api/prompt_initial",
                    "professor_input": "Your reaction to that feedback"
                },
                "response": {
                    "success": true,
                    "response": "Revised grade and feedback",
                    "initial_feedback": "Your initial feedback",
                    "professor_input": "Your input"
                }
            }
        }
    }))
}
