//! Append-only audit log, written on authentication events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

pub const AUTHENTICATION_SUCCESS: &str = "AUTHENTICATION_SUCCESS";
pub const AUTHENTICATION_FAILURE: &str = "AUTHENTICATION_FAILURE";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PersistentAuditEvent {
    pub event_id: Option<i64>,
    pub principal: String,
    pub event_date: DateTime<Utc>,
    pub event_type: String,
    /// JSON payload, stored as text.
    pub data: Option<String>,
}

/// Append one audit event. Rows are never updated or deleted.
pub async fn record(
    pool: &SqlitePool,
    principal: &str,
    event_type: &str,
    data: Option<serde_json::Value>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO persistent_audit_event (principal, event_date, event_type, data)
         VALUES (?, ?, ?, ?)",
    )
    .bind(principal)
    .bind(Utc::now())
    .bind(event_type)
    .bind(data.map(|v| v.to_string()))
    .execute(pool)
    .await?;
    Ok(())
}
