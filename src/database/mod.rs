use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::auth;
use crate::config::DatabaseConfig;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// One table per entity, a join table for Job<->Task, unique foreign keys on
/// every owning one-to-one side, and the identity/audit tables.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS region (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        region_name TEXT
    )",
    "CREATE TABLE IF NOT EXISTS country (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        country_name TEXT,
        region_id INTEGER UNIQUE REFERENCES region(id)
    )",
    "CREATE TABLE IF NOT EXISTS location (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        street_address TEXT,
        postal_code TEXT,
        city TEXT,
        state_province TEXT,
        country_id INTEGER UNIQUE REFERENCES country(id)
    )",
    "CREATE TABLE IF NOT EXISTS department (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        department_name TEXT NOT NULL,
        location_id INTEGER UNIQUE REFERENCES location(id)
    )",
    "CREATE TABLE IF NOT EXISTS employee (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT,
        last_name TEXT,
        email TEXT,
        phone_number TEXT,
        hire_date TEXT,
        salary INTEGER,
        commission_pct INTEGER,
        manager_id INTEGER REFERENCES employee(id),
        department_id INTEGER REFERENCES department(id)
    )",
    "CREATE TABLE IF NOT EXISTS job (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        job_title TEXT,
        min_salary INTEGER,
        max_salary INTEGER,
        employee_id INTEGER REFERENCES employee(id)
    )",
    "CREATE TABLE IF NOT EXISTS task (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        description TEXT
    )",
    "CREATE TABLE IF NOT EXISTS job_task (
        job_id INTEGER NOT NULL REFERENCES job(id),
        task_id INTEGER NOT NULL REFERENCES task(id),
        PRIMARY KEY (job_id, task_id)
    )",
    "CREATE TABLE IF NOT EXISTS job_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_date TEXT,
        end_date TEXT,
        language TEXT,
        job_id INTEGER UNIQUE REFERENCES job(id),
        department_id INTEGER UNIQUE REFERENCES department(id),
        employee_id INTEGER UNIQUE REFERENCES employee(id)
    )",
    "CREATE TABLE IF NOT EXISTS hr_user (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        login TEXT NOT NULL UNIQUE,
        email TEXT,
        password_hash TEXT NOT NULL,
        activated INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS authority (
        name TEXT PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS user_authority (
        user_id INTEGER NOT NULL REFERENCES hr_user(id),
        authority_name TEXT NOT NULL REFERENCES authority(name),
        PRIMARY KEY (user_id, authority_name)
    )",
    "CREATE TABLE IF NOT EXISTS persistent_audit_event (
        event_id INTEGER PRIMARY KEY AUTOINCREMENT,
        principal TEXT NOT NULL,
        event_date TEXT NOT NULL,
        event_type TEXT NOT NULL,
        data TEXT
    )",
];

/// Open the connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?
        .create_if_missing(true);

    // An in-memory database is private to its connection; a larger pool would
    // hand out empty databases for every connection past the first.
    let max_connections = if config.url.contains(":memory:") {
        1
    } else {
        config.max_connections
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!("opened database pool for {}", config.url);
    Ok(pool)
}

/// Create the schema and seed the identity tables.
pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }
    seed_identity(pool).await?;
    info!("database schema is up to date");
    Ok(())
}

/// Default accounts and roles, inserted once.
async fn seed_identity(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for role in ["ROLE_ADMIN", "ROLE_USER"] {
        sqlx::query("INSERT OR IGNORE INTO authority (name) VALUES (?)")
            .bind(role)
            .execute(pool)
            .await?;
    }

    let seed_users: &[(i64, &str, &str, &[&str])] = &[
        (1, "admin", "admin@localhost", &["ROLE_ADMIN", "ROLE_USER"]),
        (2, "user", "user@localhost", &["ROLE_USER"]),
    ];

    for &(id, login, email, roles) in seed_users {
        sqlx::query(
            "INSERT OR IGNORE INTO hr_user (id, login, email, password_hash, activated)
             VALUES (?, ?, ?, ?, 1)",
        )
        .bind(id)
        .bind(login)
        .bind(email)
        .bind(auth::hash_password(login))
        .execute(pool)
        .await?;

        for &role in roles {
            sqlx::query(
                "INSERT OR IGNORE INTO user_authority (user_id, authority_name) VALUES (?, ?)",
            )
            .bind(id)
            .bind(role)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

/// Pings the pool to ensure connectivity.
pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 10,
        }
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let pool = connect(&memory_config()).await.unwrap();
        migrate(&pool).await.unwrap();
        migrate(&pool).await.unwrap();

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hr_user")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 2);
    }

    #[tokio::test]
    async fn health_check_succeeds_on_fresh_pool() {
        let pool = connect(&memory_config()).await.unwrap();
        health_check(&pool).await.unwrap();
    }
}
