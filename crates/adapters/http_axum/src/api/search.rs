//! Handler for `POST /search`.
//!
//! A body carrying `query` searches names by substring and answers with an
//! array. Otherwise a body carrying `id` looks a single record up and hides
//! its `photo` key unless `has_photo` is truthy.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use stockroom_app::ports::{DeviceRepository, PhotoStore};
use stockroom_app::services::device_service::SearchOutcome;
use stockroom_domain::device::Device;
use stockroom_domain::error::ValidationError;
use stockroom_domain::id::DeviceId;
use stockroom_domain::search::{SearchCriterion, is_truthy};

use crate::error::{ApiError, ErrorBody, parse_device_id};
use crate::state::AppState;
use crate::submission::Submission;

/// Fields read by `POST /search`. `query` wins when both are given.
#[derive(ToSchema)]
pub struct SearchForm {
    /// Case-insensitive substring of `inventory_name`.
    pub query: Option<String>,
    pub id: Option<i64>,
    /// Keep `photo` in an id lookup (`true`, `1`, `on` or `yes`).
    pub has_photo: Option<bool>,
}

/// A record returned by an id lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceView {
    #[schema(value_type = i64)]
    pub id: DeviceId,
    pub inventory_name: String,
    pub description: String,
    /// Only present when `has_photo` was set.
    // `None` drops the key, `Some(None)` renders `null`.
    #[allow(clippy::option_option)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub photo: Option<Option<String>>,
}

impl DeviceView {
    fn new(device: Device, include_photo: bool) -> Self {
        Self {
            id: device.id,
            inventory_name: device.inventory_name,
            description: device.description,
            photo: include_photo.then_some(device.photo),
        }
    }
}

/// Body of a successful search.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SearchResult {
    /// Name matches, in id order.
    Matches(Vec<Device>),
    /// The record found by id.
    Device(DeviceView),
}

/// Possible responses from the search endpoint.
pub enum SearchResponse {
    Ok(Json<SearchResult>),
}

impl IntoResponse for SearchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn criterion(mut submission: Submission) -> Result<SearchCriterion, ApiError> {
    if let Some(query) = submission.take_non_empty("query") {
        return Ok(SearchCriterion::by_name(query)?);
    }
    let Some(raw_id) = submission.take_non_empty("id") else {
        return Err(ValidationError::MissingQuery.into());
    };
    Ok(SearchCriterion::ById {
        id: parse_device_id(&raw_id)?,
        include_photo: submission.text("has_photo").is_some_and(is_truthy),
    })
}

/// `POST /search`
#[utoipa::path(
    post,
    path = "/search",
    tag = "inventory",
    request_body(content(
        (SearchForm = "multipart/form-data"),
        (SearchForm = "application/x-www-form-urlencoded"),
        (SearchForm = "application/json")
    )),
    responses(
        (status = 200, description = "Name matches, or the record found by id", body = SearchResult),
        (status = 400, description = "Neither query nor id given", body = ErrorBody),
        (status = 404, description = "No device with that id", body = ErrorBody)
    )
)]
pub async fn search<R, P>(
    State(state): State<AppState<R, P>>,
    submission: Submission,
) -> Result<SearchResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let criterion = criterion(submission)?;
    let result = match state.device_service.search(criterion).await? {
        SearchOutcome::Device {
            device,
            include_photo,
        } => SearchResult::Device(DeviceView::new(device, include_photo)),
        SearchOutcome::Matches(devices) => SearchResult::Matches(devices),
    };
    Ok(SearchResponse::Ok(Json(result)))
}
