use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::{AtlasError, Result as AtlasResult};
use crate::external::{CountryInfo, WeatherQuery, WeatherReport};
use crate::store::{City, Country, Entity};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<AtlasError> for ApiError {
    fn from(err: AtlasError) -> Self {
        let status = match &err {
            AtlasError::NotFound(_) => StatusCode::NOT_FOUND,
            AtlasError::Conflict(_)
            | AtlasError::Validation(_)
            | AtlasError::ParentNotFound { .. }
            | AtlasError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AtlasError::Configuration(_)
            | AtlasError::Unauthorized(_)
            | AtlasError::Unavailable(_)
            | AtlasError::Unknown(_)
            | AtlasError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if !err.is_client_error() {
            warn!(error = %err, "request failed");
        }
        ApiError(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

/// Path parameters, with parse failures answered in the JSON error shape.
type PathParam<T> = Result<Path<T>, PathRejection>;

type ApiResult<T> = Result<T, ApiError>;

// ─── Generic CRUD ────────────────────────────────────────────────

pub async fn list_all<E>(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<E>>>
where
    E: Entity + Serialize + Send + 'static,
{
    Ok(Json(state.with_repo::<E, _, _>(|repo| repo.list(None))?))
}

pub async fn list_children<E>(
    State(state): State<Arc<AppState>>,
    parent_id: PathParam<i64>,
) -> ApiResult<Json<Vec<E>>>
where
    E: Entity + Serialize + Send + 'static,
{
    let Path(parent_id) = parent_id?;
    Ok(Json(state.with_repo::<E, _, _>(|repo| repo.list(Some(parent_id)))?))
}

pub async fn get_one<E>(
    State(state): State<Arc<AppState>>,
    id: PathParam<i64>,
) -> ApiResult<Json<E>>
where
    E: Entity + Serialize + Send + 'static,
{
    let Path(id) = id?;
    Ok(Json(state.with_repo::<E, _, _>(|repo| repo.get(id))?))
}

pub async fn create<E>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<E::Input>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<E>)>
where
    E: Entity + Serialize + Send + 'static,
    E::Input: DeserializeOwned + Send + 'static,
{
    let Json(input) = payload?;
    let created = state.with_repo::<E, _, _>(|repo| repo.create(&input))?;
    info!(kind = E::KIND, "created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update<E>(
    State(state): State<Arc<AppState>>,
    id: PathParam<i64>,
    payload: Result<Json<E::Input>, JsonRejection>,
) -> ApiResult<Json<E>>
where
    E: Entity + Serialize + Send + 'static,
    E::Input: DeserializeOwned + Send + 'static,
{
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(state.with_repo::<E, _, _>(|repo| repo.update(id, &input))?))
}

pub async fn delete<E>(
    State(state): State<Arc<AppState>>,
    id: PathParam<i64>,
) -> ApiResult<StatusCode>
where
    E: Entity + Send + 'static,
{
    let Path(id) = id?;
    state.with_repo::<E, _, _>(|repo| repo.delete(id))?;
    info!(kind = E::KIND, id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ─── GET /cities/continent/{id} ──────────────────────────────────

pub async fn cities_by_continent(
    State(state): State<Arc<AppState>>,
    continent_id: PathParam<i64>,
) -> ApiResult<Json<Vec<City>>> {
    let Path(continent_id) = continent_id?;
    Ok(Json(state.with_repo::<City, _, _>(|repo| repo.list_by_continent(continent_id))?))
}

// ─── External lookups ────────────────────────────────────────────

/// Run a blocking gateway call off the async workers.
async fn blocking<T, F>(op: F) -> AtlasResult<T>
where
    F: FnOnce() -> AtlasResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| AtlasError::Unknown(format!("lookup task failed: {}", e)))?
}

pub async fn country_info_by_id(
    State(state): State<Arc<AppState>>,
    id: PathParam<i64>,
) -> ApiResult<Json<CountryInfo>> {
    let Path(id) = id?;
    let country = state.with_repo::<Country, _, _>(|repo| repo.get(id))?;
    country_info(&state, country.name).await
}

pub async fn country_info_by_name(
    State(state): State<Arc<AppState>>,
    name: PathParam<String>,
) -> ApiResult<Json<CountryInfo>> {
    let Path(name) = name?;
    country_info(&state, name).await
}

async fn country_info(state: &AppState, name: String) -> ApiResult<Json<CountryInfo>> {
    let start = Instant::now();
    let gateway = state.gateway.clone();
    let query = name.clone();
    let details = blocking(move || gateway.country_info(&query)).await?;

    info!(
        country = %name,
        resolved = %details.name,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "country info"
    );
    Ok(Json(details))
}

pub async fn city_weather(
    State(state): State<Arc<AppState>>,
    id: PathParam<i64>,
) -> ApiResult<Json<WeatherReport>> {
    let Path(id) = id?;
    let start = Instant::now();
    let city = state.with_repo::<City, _, _>(|repo| repo.get(id))?;

    let query = WeatherQuery::new(&city.latitude, &city.longitude)
        .with_city(&city.name)
        .with_country(&city.country.name);
    let gateway = state.gateway.clone();
    let report = blocking(move || gateway.weather(&query)).await?;

    info!(
        city = %city.name,
        method = %report.method,
        temperature = report.temperature,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "city weather"
    );
    Ok(Json(report))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
