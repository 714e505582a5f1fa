use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use configuration::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use store::Repository;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub settings: Settings,
}

/// The main function to configure and run the web server.
///
/// Tracing is initialized by the binary entry point, not here, so embedding
/// the server never fights over the global subscriber.
pub async fn run_server(addr: SocketAddr, settings: Settings) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let db_pool = store::connect().await?;
    store::run_migrations(&db_pool).await?;
    let repo = Repository::new(db_pool);

    // Image uploads are the largest request bodies; leave headroom over the
    // configured per-image cap for the multipart framing.
    let body_limit = settings.uploads.max_image_bytes * 2;

    let app_state = Arc::new(AppState { repo, settings });
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/api/orders/:id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/api/reports/income", get(handlers::income_report))
        .route("/api/images", post(handlers::upload_image))
        .route(
            "/api/images/:id",
            get(handlers::get_image).delete(handlers::delete_image),
        )
        .route("/api/images/:id/blob", get(handlers::get_image_blob))
        .with_state(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit));

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
