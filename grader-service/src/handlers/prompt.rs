use super::complete;
use crate::dtos::PromptResponse;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

/// Pulls `message` out of the JSON body. A body that is absent, unparseable
/// or not an object counts as a missing field; one over the body limit is 413.
fn message_from_body(payload: Result<Json<Value>, JsonRejection>) -> Result<String, AppError> {
    let message = match payload {
        Ok(Json(Value::Object(mut body))) => body.remove("message"),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(AppError::PayloadTooLarge(rejection.body_text()));
        }
        _ => None,
    }
    .ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Missing \"message\" field in request body"))
    })?;

    match message {
        Value::String(text) if !text.is_empty() => Ok(text),
        _ => Err(AppError::BadRequest(anyhow::anyhow!(
            "Message must be a non-empty string"
        ))),
    }
}

/// `POST /api/prompt`: relays a raw message as a single user turn.
#[tracing::instrument(skip(state, payload))]
pub async fn prompt(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PromptResponse>, AppError> {
    let message = message_from_body(payload)?;

    let completion = complete(&state, "prompt", &message).await?;

    Ok(Json(PromptResponse {
        success: true,
        response: completion.text,
        input_message: message,
    }))
}
