pub mod error;
pub mod middleware;
pub mod routes;

use axum::middleware as axum_mw;
use axum::routing::get;
use axum::Router;
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::context::AppContext;

pub fn router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::health))
        .route("/users", get(routes::list_users))
        .route("/messages", get(routes::list_messages))
        .route("/questions", get(routes::list_questions))
        .layer(axum_mw::from_fn(middleware::request_log))
        .layer(cors)
        .with_state(ctx)
}

/// binds 0.0.0.0:`port` and serves until the process exits
pub async fn serve(ctx: AppContext, port: u16) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(ctx)).await
}
