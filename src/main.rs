use hr_api::{app, config, database, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up HR_DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting HR API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .expect("failed to open database");
    database::migrate(&pool).await.expect("failed to run migrations");

    let state = AppState::new(pool);
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("HR API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
