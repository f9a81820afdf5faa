use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod audit;
pub mod auth;
pub mod cache;
pub mod config;
pub mod crud;
pub mod database;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod service;

use domain::{Country, Department, Employee, JobHistory, Location, Region, Task};

/// Shared per-request state: the connection pool and the second-level cache.
///
/// Requests share nothing else; concurrency control is delegated to the
/// storage layer's transactions.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub cache: Arc<cache::CacheManager>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cache: Arc::new(cache::CacheManager::new(&config::config().cache)),
        }
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/authenticate", post(auth::authenticate))
        // Entity CRUD surface
        .merge(handlers::crud_routes::<Region>())
        .merge(handlers::crud_routes::<Country>())
        .merge(handlers::crud_routes::<Location>())
        .merge(handlers::crud_routes::<Department>())
        .merge(handlers::crud_routes::<Employee>())
        .merge(handlers::crud_routes::<Task>())
        .merge(handlers::crud_routes::<JobHistory>())
        // Job gets hand-written routes for the eagerload variants
        .merge(handlers::job_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
