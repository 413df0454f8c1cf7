//! Encoding-agnostic request body extractor.
//!
//! HTML forms post `multipart/form-data` or `application/x-www-form-urlencoded`,
//! scripts tend to post JSON. [`Submission`] flattens all three into text
//! fields plus an optional `photo` file so handlers only deal with one shape.
//! A request without a recognised content type yields an empty submission.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use stockroom_domain::error::ValidationError;
use stockroom_domain::photo::PhotoUpload;

use crate::error::ApiError;

/// Name of the multipart part carrying the photo file.
pub const PHOTO_FIELD: &str = "photo";

/// Text fields and an optional photo, whatever the body encoding was.
#[derive(Debug, Default)]
pub struct Submission {
    fields: HashMap<String, String>,
    /// Attached photo, if a non-empty file was uploaded under [`PHOTO_FIELD`].
    pub photo: Option<PhotoUpload>,
}

impl Submission {
    /// Borrow a text field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Remove and return a text field.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Remove a text field, treating an empty value as absent.
    pub fn take_non_empty(&mut self, name: &str) -> Option<String> {
        self.take(name).filter(|value| !value.is_empty())
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut submission = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| rejected(err.status(), &err))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(ToOwned::to_owned) {
                Some(filename) if name == PHOTO_FIELD => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|err| rejected(err.status(), &err))?;
                    submission.photo = PhotoUpload::attached(filename, bytes.to_vec());
                }
                // Files under any other name are ignored.
                Some(_) => {}
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|err| rejected(err.status(), &err))?;
                    submission.fields.insert(name, value);
                }
            }
        }
        Ok(submission)
    }

    fn from_json(object: Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .filter_map(|(key, value)| scalar_text(value).map(|text| (key, text)))
            .collect();
        Self {
            fields,
            photo: None,
        }
    }
}

/// Render a JSON value the way it would have arrived in a form field.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Turn an extractor rejection into an API error, keeping the one status
/// axum reports that is not a plain malformed body.
fn rejected(status: StatusCode, reason: impl std::fmt::Display) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::PayloadTooLarge.into()
    } else {
        ValidationError::MalformedRequest(reason.to_string()).into()
    }
}

impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| rejected(rejection.status(), &rejection))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(object) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|rejection| rejected(rejection.status(), &rejection))?;
            Ok(Self::from_json(object))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let axum::Form(fields) = axum::Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|rejection| rejected(rejection.status(), &rejection))?;
            Ok(Self {
                fields,
                photo: None,
            })
        } else {
            Ok(Self::default())
        }
    }
}
