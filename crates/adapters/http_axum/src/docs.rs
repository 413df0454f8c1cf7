//! OpenAPI document and the browsable page that renders it.
//!
//! The document is generated from the `#[utoipa::path]` annotations on the
//! handlers in [`crate::api`], so a route listed here but missing from the
//! router (or the other way round) shows up in the router tests.

use std::sync::LazyLock;

use axum::Json;
use axum::Router;
use axum::response::Html;
use axum::routing::get;
use utoipa::OpenApi;

use stockroom_domain::device::Device;

use crate::api::devices::{self, RegisterForm, UpdateForm};
use crate::api::photos::{self, PhotoForm};
use crate::api::search::{self, DeviceView, SearchForm, SearchResult};
use crate::error::ErrorBody;

static DOCS_PAGE: &str = include_str!("../templates/docs.html");

static OPENAPI: LazyLock<utoipa::openapi::OpenApi> = LazyLock::new(ApiDoc::openapi);

/// OpenAPI description of every inventory route.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "stockroom",
        description = "Inventory of devices with an optional photo each."
    ),
    paths(
        devices::register,
        devices::list,
        devices::get,
        devices::update,
        devices::delete,
        photos::get,
        photos::replace,
        search::search
    ),
    components(schemas(
        Device,
        DeviceView,
        SearchResult,
        RegisterForm,
        UpdateForm,
        PhotoForm,
        SearchForm,
        ErrorBody
    )),
    tags(
        (name = "inventory", description = "Device records"),
        (name = "photos", description = "Photo files attached to devices")
    )
)]
pub struct ApiDoc;

/// Build the `/openapi.json` and `/docs` routes.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(docs_page))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(OPENAPI.clone())
}

async fn docs_page() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
