mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

async fn audit_count(state: &hr_api::AppState, event_type: &str) -> Result<i64> {
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM persistent_audit_event WHERE event_type = ?",
    )
    .bind(event_type)
    .fetch_one(&state.pool)
    .await?;
    Ok(count)
}

#[tokio::test]
async fn authenticate_issues_a_token() -> Result<()> {
    let (app, state) = common::test_app().await?;

    let (status, headers, body) = common::post(
        &app,
        "/api/authenticate",
        json!({ "username": "admin", "password": "admin" }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let token = body["id_token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert!(headers
        .get("authorization")
        .unwrap()
        .to_str()?
        .starts_with("Bearer "));

    assert_eq!(audit_count(&state, "AUTHENTICATION_SUCCESS").await?, 1);
    Ok(())
}

#[tokio::test]
async fn bad_password_is_unauthorized_and_audited() -> Result<()> {
    let (app, state) = common::test_app().await?;

    let (status, _, body) = common::post(
        &app,
        "/api/authenticate",
        json!({ "username": "admin", "password": "wrong" }),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errorKey"], "unauthorized");
    assert_eq!(audit_count(&state, "AUTHENTICATION_FAILURE").await?, 1);
    assert_eq!(audit_count(&state, "AUTHENTICATION_SUCCESS").await?, 0);
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_unauthorized() -> Result<()> {
    let (app, _state) = common::test_app().await?;

    let (status, _, _) = common::post(
        &app,
        "/api/authenticate",
        json!({ "username": "nobody", "password": "nothing" }),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let (app, _state) = common::test_app().await?;

    let (status, _, body) = common::get(&app, "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}
