use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, IntoMakeService};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::models::GenericResponse;

pub fn build() -> IntoMakeService<Router> {
    router().into_make_service()
}

/// Liveness surface only, the reminder scheduler carries no routes
pub fn router() -> Router {
    tracing::debug!("Initializing the app");
    Router::new()
        .route("/", get(default_route_handler))
        .route("/ping", get(ping_handler))
        .fallback(global_404_handler)
        .layer(TraceLayer::new_for_http())
}

async fn default_route_handler() -> impl IntoResponse {
    let response = GenericResponse {
        success: true,
        message: "Reminder service is running".to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn ping_handler() -> impl IntoResponse {
    let response = GenericResponse {
        success: true,
        message: "Server running successfully!".to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn global_404_handler() -> impl IntoResponse {
    let response = GenericResponse {
        success: false,
        message: "Requested resource not found".to_string(),
    };
    (StatusCode::NOT_FOUND, Json(response))
}
