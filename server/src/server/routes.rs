//! Router configuration for the booking service.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::health_check;
use super::middleware::request_id_layer;
use super::state::AppState;
use crate::api::{activities, reservations, sessions};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// Configures:
/// - `/health`
/// - the booking API under `/api`
/// - `/metrics` in Prometheus text format, when the state carries a handle
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/activities", get(activities::list_activities))
        .route("/sessions", get(sessions::list_sessions))
        .route("/reservations", post(reservations::create_reservation))
        .route(
            "/reservations/:id",
            get(reservations::get_reservation).delete(reservations::cancel_reservation),
        );

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes);

    if state.prometheus.is_some() {
        router = router.route("/metrics", get(render_metrics));
    }

    router
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
