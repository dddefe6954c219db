//! Shelfmark Server - Library Shelf and Lending Management
//!
//! REST API server for managing shelves, racks, books and borrows.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfmark_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("shelfmark_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shelfmark Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config);

    // Make sure the administrator account exists before serving requests
    services
        .users
        .seed_admin(&config.admin.username, &config.admin.password)
        .await
        .expect("Failed to seed administrator account");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        // Shelves
        .route("/shelves", get(api::shelves::list_shelves))
        .route("/shelves", post(api::shelves::create_shelf))
        .route("/shelves/:id", get(api::shelves::get_shelf))
        .route("/shelves/:id", delete(api::shelves::delete_shelf))
        .route("/shelves/:id/regenerate-qr", post(api::shelves::regenerate_qr))
        // Racks
        .route("/racks", get(api::racks::list_racks))
        .route("/racks", post(api::racks::create_rack))
        .route("/racks/:id", delete(api::racks::delete_rack))
        // Borrows
        .route("/borrows", post(api::borrows::create_borrow))
        .route("/borrows/mine", get(api::borrows::my_borrows))
        .route("/borrows/:id/return", post(api::borrows::return_borrow))
        .route("/borrows/:id/reissue", post(api::borrows::reissue_borrow))
        // Overview
        .route("/overview", get(api::overview::get_overview))
        .with_state(state.clone());

    // Same handler the shelf QR codes point at, without the /api/v1 prefix
    let scan = Router::new()
        .route("/shelf/:id", get(api::shelves::get_shelf))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(scan)
        .nest_service("/qr", ServeDir::new(state.config.qr.output_dir.clone()))
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
