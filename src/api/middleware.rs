use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::info;

/// logs method, path and status of every request
pub async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}
