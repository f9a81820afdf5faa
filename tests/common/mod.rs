#![allow(dead_code)]

use anyhow::Result;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use hr_api::config::DatabaseConfig;
use hr_api::{app, database, AppState};

/// Build a router backed by a fresh in-memory database with the schema and
/// identity seed applied.
pub async fn test_app() -> Result<(Router, AppState)> {
    let pool = database::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await?;
    database::migrate(&pool).await?;
    let state = AppState::new(pool);
    Ok((app(state.clone()), state))
}

/// Drive one request through the router and decode the JSON body (Null for
/// empty bodies).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, HeaderMap, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(json.to_string()))?
        }
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, headers, value))
}

pub async fn get(app: &Router, uri: &str) -> Result<(StatusCode, HeaderMap, Value)> {
    request(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> Result<(StatusCode, HeaderMap, Value)> {
    request(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> Result<(StatusCode, HeaderMap, Value)> {
    request(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Result<(StatusCode, HeaderMap, Value)> {
    request(app, "DELETE", uri, None).await
}

/// Number of rows a list endpoint currently reports.
pub async fn count(app: &Router, uri: &str) -> Result<usize> {
    let (status, _, body) = get(app, uri).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body.as_array().map(Vec::len).unwrap_or(0))
}
