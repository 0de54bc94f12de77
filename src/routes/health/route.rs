use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

pub fn create_route() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Transfer credit evaluation API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "transfer-service-api",
    }))
}
