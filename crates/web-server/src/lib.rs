use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

pub mod error;
pub mod handlers;
pub mod pdf;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
}

/// Builds the application router with CORS, request logging and panic recovery.
///
/// `allowed_origin` is the single browser origin permitted by CORS.
pub fn build_router(state: AppState, allowed_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_str(allowed_origin)?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::HEAD,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]);

    let books = Router::new()
        .route("/books", get(handlers::list_books))
        .route("/books/", get(handlers::list_books))
        .route("/books/search", get(handlers::search_books))
        .route("/books/:id/download", get(handlers::download_pdf))
        .route("/books/:id/page-count", get(handlers::page_count));

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/v1", books)
        .fallback(handlers::fallback)
        .with_state(Arc::new(state))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors)
        // Logs method, path, status and latency for every request.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        );

    Ok(app)
}

/// Binds `addr` and serves the API until the process exits.
pub async fn run_server(addr: SocketAddr, state: AppState, allowed_origin: &str) -> anyhow::Result<()> {
    let app = build_router(state, allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
