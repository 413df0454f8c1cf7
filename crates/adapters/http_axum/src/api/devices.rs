//! Handlers for registering, reading, updating and deleting devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use utoipa::ToSchema;

use stockroom_app::ports::{DeviceRepository, PhotoStore};
use stockroom_domain::device::{Device, DevicePatch};

use crate::error::{ApiError, ErrorBody, parse_device_id};
use crate::state::AppState;
use crate::submission::Submission;

/// Fields read by `POST /register`.
///
/// Sent as JSON, URL-encoded or multipart; only multipart can carry `photo`.
#[derive(ToSchema)]
pub struct RegisterForm {
    pub inventory_name: String,
    pub description: Option<String>,
    /// Photo file.
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

/// Fields read by `PUT /inventory/{id}`. Empty or missing fields keep their
/// current value.
#[derive(ToSchema)]
pub struct UpdateForm {
    pub inventory_name: Option<String>,
    pub description: Option<String>,
    /// Replacement photo file.
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning a single record.
pub enum DeviceResponse {
    Ok(Json<Device>),
}

impl IntoResponse for DeviceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<Device>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `POST /register`
#[utoipa::path(
    post,
    path = "/register",
    tag = "inventory",
    request_body(content(
        (RegisterForm = "multipart/form-data"),
        (RegisterForm = "application/x-www-form-urlencoded"),
        (RegisterForm = "application/json")
    )),
    responses(
        (status = 201, description = "Created record", body = Device),
        (status = 400, description = "inventory_name missing", body = ErrorBody)
    )
)]
pub async fn register<R, P>(
    State(state): State<AppState<R, P>>,
    mut submission: Submission,
) -> Result<RegisterResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let mut builder = Device::builder();
    if let Some(name) = submission.take("inventory_name") {
        builder = builder.inventory_name(name);
    }
    if let Some(description) = submission.take("description") {
        builder = builder.description(description);
    }
    let device = builder.build()?;

    let created = state
        .device_service
        .register_device(device, submission.photo)
        .await?;
    Ok(RegisterResponse::Created(Json(created)))
}

/// `GET /inventory`
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    responses((status = 200, description = "All records in id order", body = Vec<Device>))
)]
pub async fn list<R, P>(State(state): State<AppState<R, P>>) -> Result<ListResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /inventory/{id}`
#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Device id")),
    responses(
        (status = 200, description = "The record", body = Device),
        (status = 404, description = "No such device", body = ErrorBody)
    )
)]
pub async fn get<R, P>(
    State(state): State<AppState<R, P>>,
    Path(id): Path<String>,
) -> Result<DeviceResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let device_id = parse_device_id(&id)?;
    let device = state.device_service.get_device(device_id).await?;
    Ok(DeviceResponse::Ok(Json(device)))
}

/// `PUT /inventory/{id}`
///
/// Empty or missing fields keep their current value. A multipart body may
/// carry a `photo` file that replaces the current one.
#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Device id")),
    request_body(content(
        (UpdateForm = "multipart/form-data"),
        (UpdateForm = "application/x-www-form-urlencoded"),
        (UpdateForm = "application/json")
    )),
    responses(
        (status = 200, description = "Updated record", body = Device),
        (status = 404, description = "No such device", body = ErrorBody)
    )
)]
pub async fn update<R, P>(
    State(state): State<AppState<R, P>>,
    Path(id): Path<String>,
    mut submission: Submission,
) -> Result<DeviceResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let device_id = parse_device_id(&id)?;
    let patch = DevicePatch {
        inventory_name: submission.take_non_empty("inventory_name"),
        description: submission.take_non_empty("description"),
        photo: None,
    };
    let updated = state
        .device_service
        .update_device(device_id, patch, submission.photo)
        .await?;
    Ok(DeviceResponse::Ok(Json(updated)))
}

/// `DELETE /inventory/{id}`
///
/// The record's photo file is removed with it.
#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Device id")),
    responses(
        (status = 200, description = "Deleted record", body = Device),
        (status = 404, description = "No such device", body = ErrorBody)
    )
)]
pub async fn delete<R, P>(
    State(state): State<AppState<R, P>>,
    Path(id): Path<String>,
) -> Result<DeviceResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let device_id = parse_device_id(&id)?;
    let removed = state.device_service.delete_device(device_id).await?;
    Ok(DeviceResponse::Ok(Json(removed)))
}
