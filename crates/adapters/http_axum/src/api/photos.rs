//! Handlers for a device's photo file.

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use utoipa::ToSchema;

use stockroom_app::ports::{DeviceRepository, PhotoStore};
use stockroom_domain::device::Device;

use crate::api::devices::DeviceResponse;
use crate::error::{ApiError, ErrorBody, parse_device_id};
use crate::state::AppState;
use crate::submission::Submission;

/// Multipart body of `PUT /inventory/{id}/photo`.
#[derive(ToSchema)]
pub struct PhotoForm {
    /// Replacement photo file.
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}

/// `GET /inventory/{id}/photo`
///
/// Streams the stored file with a content type guessed from its extension.
/// A record pointing at a file that is gone from disk yields a bare 404.
#[utoipa::path(
    get,
    path = "/inventory/{id}/photo",
    tag = "photos",
    params(("id" = i64, Path, description = "Device id")),
    responses(
        (status = 200, description = "Photo file, typed by its extension"),
        (status = 404, description = "No such device, no photo, or the file is gone")
    )
)]
pub async fn get<R, P>(
    State(state): State<AppState<R, P>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Response, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let device_id = parse_device_id(&id)?;
    let Some(path) = state.device_service.photo_file(device_id).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

/// `PUT /inventory/{id}/photo`
#[utoipa::path(
    put,
    path = "/inventory/{id}/photo",
    tag = "photos",
    params(("id" = i64, Path, description = "Device id")),
    request_body(content = PhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated record", body = Device),
        (status = 400, description = "No file attached", body = ErrorBody),
        (status = 404, description = "No such device", body = ErrorBody)
    )
)]
pub async fn replace<R, P>(
    State(state): State<AppState<R, P>>,
    Path(id): Path<String>,
    submission: Submission,
) -> Result<DeviceResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let device_id = parse_device_id(&id)?;
    let updated = state
        .device_service
        .replace_photo(device_id, submission.photo)
        .await?;
    Ok(DeviceResponse::Ok(axum::Json(updated)))
}
