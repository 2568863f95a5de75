use super::complete;
use super::extract::{multipart_error, FormFields};
use crate::dtos::{GradingResponse, RevisionRequest, RevisionResponse};
use crate::services::metrics::record_extracted_chars;
use crate::services::prompts::{grading_prompt, revision_prompt};
use crate::services::upload::{allowed_file, sanitize_filename};
use crate::services::{extract_text, ExtractedText};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

const PDF_FIELD: &str = "pdf_file";
const EXPLANATION_FIELD: &str = "explanation";

fn bad_request(msg: &str) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(msg.to_string()))
}

/// Validated contents of a grading upload.
#[derive(Debug)]
struct GradingUpload {
    filename: String,
    bytes: Bytes,
    explanation: String,
}

impl GradingUpload {
    /// Reads the multipart body. The filename is checked as soon as the file
    /// part arrives, so a disallowed upload is never buffered.
    async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut file: Option<(String, Bytes)> = None;
        let mut explanation: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some(PDF_FIELD) => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    check_filename(&filename)?;
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    file = Some((filename, bytes));
                }
                Some(EXPLANATION_FIELD) => {
                    explanation = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => {}
            }
        }

        let (filename, bytes) = file.ok_or_else(|| bad_request("No PDF file provided"))?;
        let explanation = explanation
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| bad_request("Explanation is required"))?;

        Ok(Self {
            filename,
            bytes,
            explanation,
        })
    }
}

fn check_filename(filename: &str) -> Result<(), AppError> {
    if filename.is_empty() {
        return Err(bad_request("No file selected"));
    }
    if !allowed_file(filename) {
        return Err(bad_request(
            "Invalid file type. Only PDF files are allowed.",
        ));
    }
    Ok(())
}

/// Runs extraction on the blocking pool; lopdf parsing is CPU-bound.
async fn extract_on_blocking_pool(bytes: Bytes) -> Result<ExtractedText, AppError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("PDF extraction task failed: {}", e)))?
        .map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))
}

/// `POST /api/prompt_initial`: grades an uploaded PDF against the
/// professor's explanation.
#[tracing::instrument(skip(state, multipart))]
pub async fn prompt_initial(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GradingResponse>, AppError> {
    let upload = GradingUpload::read(&mut multipart).await?;
    let pdf_filename = sanitize_filename(&upload.filename);

    tracing::info!(
        filename = %pdf_filename,
        size = upload.bytes.len(),
        "Grading upload received"
    );

    let extracted = extract_on_blocking_pool(upload.bytes).await.map_err(|e| {
        tracing::warn!(filename = %pdf_filename, error = %e, "PDF extraction failed");
        e
    })?;
    let pdf_text_length = extracted.char_len();
    record_extracted_chars(pdf_text_length);

    let prompt = grading_prompt(&upload.explanation, extracted.as_str());
    let completion = complete(&state, "prompt_initial", &prompt).await?;

    Ok(Json(GradingResponse {
        success: true,
        response: completion.text,
        pdf_filename,
        explanation: upload.explanation,
        pdf_text_length,
    }))
}

/// `POST /api/prompt_redo`: asks the model to revise its earlier grading in
/// light of the professor's input.
#[tracing::instrument(skip(state, request))]
pub async fn prompt_redo(
    State(state): State<AppState>,
    FormFields(request): FormFields<RevisionRequest>,
) -> Result<Json<RevisionResponse>, AppError> {
    request.trimmed().validate()?;

    let prompt = revision_prompt(&request.initial_feedback, &request.professor_input);
    let completion = complete(&state, "prompt_redo", &prompt).await?;

    Ok(Json(RevisionResponse {
        success: true,
        response: completion.text,
        initial_feedback: request.initial_feedback,
        professor_input: request.professor_input,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::BadRequest(e) => e.to_string(),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn empty_filename_means_nothing_was_selected() {
        assert_eq!(message(check_filename("").unwrap_err()), "No file selected");
    }

    #[test]
    fn non_pdf_filename_is_rejected() {
        assert_eq!(
            message(check_filename("notes.txt").unwrap_err()),
            "Invalid file type. Only PDF files are allowed."
        );
        assert!(check_filename("Essay.PDF").is_ok());
    }

    #[tokio::test]
    async fn unreadable_pdf_is_a_bad_request() {
        let err = extract_on_blocking_pool(Bytes::from_static(b"%PDF-garbage"))
            .await
            .unwrap_err();
        assert!(message(err).starts_with("Could not read the PDF file"));
    }
}
