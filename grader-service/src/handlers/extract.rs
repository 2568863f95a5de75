//! Request extractors that report failures as JSON `AppError`s.

use async_trait::async_trait;
use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use service_core::error::AppError;

/// Converts a multipart read failure, keeping body-limit rejections as 413.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(anyhow::anyhow!(
            "Failed to read multipart field: {}",
            err.body_text()
        ))
    }
}

/// Converts an extractor rejection, keeping body-limit rejections as 413.
fn rejection_error(status: StatusCode, body_text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(body_text)
    } else {
        AppError::BadRequest(anyhow::anyhow!(body_text))
    }
}

/// Text form fields from either `application/x-www-form-urlencoded` or
/// `multipart/form-data` bodies. File parts in a multipart body are ignored.
pub struct FormFields<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormFields<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| rejection_error(e.status(), e.body_text()))?;
            return Ok(FormFields(value));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| rejection_error(e.status(), e.body_text()))?;

        let mut fields = Map::new();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                continue;
            }
            let value = field.text().await.map_err(multipart_error)?;
            fields.insert(name, Value::String(value));
        }

        serde_json::from_value(Value::Object(fields))
            .map(FormFields)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid form data: {}", e)))
    }
}
