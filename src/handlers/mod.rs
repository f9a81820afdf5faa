//! HTTP-facing layer.
//!
//! One generic handler set serves every entity; `crud_routes::<T>()` mounts
//! the five endpoints for a model. Id-presence checks and validation happen
//! here, before anything reaches the service layer.

pub mod jobs;

pub use jobs::job_routes;

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use crate::crud::CrudModel;
use crate::database;
use crate::error::ApiError;
use crate::pagination::{self, PageParams};
use crate::service::CrudService;
use crate::AppState;

/// Mount POST/PUT/GET/GET-by-id/DELETE for one entity under /api/{resource}.
pub fn crud_routes<T: CrudModel>() -> Router<AppState> {
    let collection = format!("/api/{}", T::RESOURCE);
    let item = format!("/api/{}/:id", T::RESOURCE);
    Router::new()
        .route(
            &collection,
            post(create::<T>).put(update::<T>).get(list::<T>),
        )
        .route(&item, get(get_one::<T>).delete(delete_one::<T>))
}

/// POST /api/{resource} : create a new entity. The caller must not supply an
/// id.
pub async fn create<T: CrudModel>(
    State(state): State<AppState>,
    Json(entity): Json<T>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to save {}", T::ENTITY_NAME);
    if entity.id().is_some() {
        return Err(ApiError::bad_request_alert(
            format!("A new {} cannot already have an ID", T::ENTITY_NAME),
            T::ENTITY_NAME,
            "idexists",
        ));
    }
    entity.validate()?;

    let saved = CrudService::save(&state, entity).await?;
    let id = saved
        .id()
        .ok_or_else(|| ApiError::internal_server_error("no id assigned on insert"))?;

    let mut headers = alert_headers(
        format!("A new {} is created with identifier {}", T::ENTITY_NAME, id),
        id,
    );
    if let Ok(location) = HeaderValue::from_str(&format!("/api/{}/{}", T::RESOURCE, id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
}

/// PUT /api/{resource} : update an existing entity. The caller must supply an
/// id; the id is not checked for existence, so an unknown id creates a row
/// under that id (save-by-primary-key semantics).
pub async fn update<T: CrudModel>(
    State(state): State<AppState>,
    Json(entity): Json<T>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to update {}", T::ENTITY_NAME);
    let Some(id) = entity.id() else {
        return Err(ApiError::bad_request_alert(
            "Invalid id",
            T::ENTITY_NAME,
            "idnull",
        ));
    };
    entity.validate()?;

    let saved = CrudService::save(&state, entity).await?;
    let headers = alert_headers(
        format!("A {} is updated with identifier {}", T::ENTITY_NAME, id),
        id,
    );
    Ok((headers, Json(saved)).into_response())
}

/// GET /api/{resource} : list entities, paginated when the model asks for it.
pub async fn list<T: CrudModel>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to get all {}", T::RESOURCE);
    if T::PAGINATED {
        let page = CrudService::find_page::<T>(&state, &params).await?;
        let headers = pagination::page_headers(uri.path(), params.sort.as_deref(), &page);
        Ok((headers, Json(page.content)).into_response())
    } else {
        let all = CrudService::find_all::<T>(&state, &params).await?;
        Ok(Json(all).into_response())
    }
}

/// GET /api/{resource}/{id} : fetch one entity or 404.
pub async fn get_one<T: CrudModel>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to get {} : {}", T::ENTITY_NAME, id);
    match CrudService::find_one::<T>(&state, id).await? {
        Some(entity) => Ok(Json(entity).into_response()),
        None => Err(ApiError::not_found(T::ENTITY_NAME)),
    }
}

/// DELETE /api/{resource}/{id} : delete by id, 204 regardless of prior
/// existence.
pub async fn delete_one<T: CrudModel>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to delete {} : {}", T::ENTITY_NAME, id);
    CrudService::delete::<T>(&state, id).await?;
    let headers = alert_headers(
        format!("A {} is deleted with identifier {}", T::ENTITY_NAME, id),
        id,
    );
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}

/// X-HrApp-Alert / X-HrApp-Params headers attached to every mutation
/// response.
fn alert_headers(message: String, id: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(&message) {
        headers.insert(HeaderName::from_static("x-hrapp-alert"), v);
    }
    if let Ok(v) = HeaderValue::from_str(&id.to_string()) {
        headers.insert(HeaderName::from_static("x-hrapp-params"), v);
    }
    headers
}

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "HR API",
        "version": version,
        "description": "HR management REST API built with Rust (Axum)",
        "endpoints": {
            "authenticate": "POST /api/authenticate (public - token acquisition)",
            "entities": "/api/{regions,countries,locations,departments,employees,jobs,tasks,job-histories}",
            "health": "GET /health (public)",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
