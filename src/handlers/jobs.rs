//! Job routes. Jobs reuse the generic create/update/delete handlers but get
//! hand-written read paths for the `?eagerload=` variant, and the by-id read
//! always resolves the task association.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::crud::CrudModel;
use crate::domain::Job;
use crate::error::ApiError;
use crate::pagination::{self, PageParams};
use crate::service::{CrudService, JobService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
    /// Eager-load the many-to-many task association. Defaults to false.
    pub eagerload: Option<bool>,
}

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/jobs",
            post(super::create::<Job>)
                .put(super::update::<Job>)
                .get(list),
        )
        .route(
            "/api/jobs/:id",
            get(get_one).delete(super::delete_one::<Job>),
        )
}

/// GET /api/jobs : a page of jobs, eagerly resolved when ?eagerload=true.
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<JobListQuery>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to get a page of Jobs");
    let params = PageParams {
        page: query.page,
        size: query.size,
        sort: query.sort,
    };
    let page = if query.eagerload.unwrap_or(false) {
        JobService::find_page_eager(&state, &params).await?
    } else {
        CrudService::find_page::<Job>(&state, &params).await?
    };
    let headers = pagination::page_headers(uri.path(), params.sort.as_deref(), &page);
    Ok((headers, Json(page.content)).into_response())
}

/// GET /api/jobs/{id} : one job with its tasks resolved.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to get Job : {}", id);
    match JobService::find_one_eager(&state, id).await? {
        Some(job) => Ok(Json(job).into_response()),
        None => Err(ApiError::not_found(Job::ENTITY_NAME)),
    }
}
