pub mod users;
pub mod listings;
pub mod bookings;
pub mod reviews;
pub mod chat;
pub mod boosts;
pub mod realtime;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> impl IntoResponse {
    common::metrics::encode_metrics()
}

/// Build the full application router: public catalogue, authenticated
/// marketplace routes, WebSockets and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/services", get(listings::search))
        .route("/api/services/:id", get(listings::get_listing))
        .route("/api/services/:id/reviews", get(reviews::list_reviews))
        .route("/api/providers/:uid", get(users::provider_page));

    let protected = Router::new()
        .route("/api/me", get(users::me).post(users::register))
        .route("/api/me/profile", put(users::update_profile))
        .route("/api/services", post(listings::create_listing))
        .route("/api/services/:id/boost", post(boosts::create_order))
        .route("/api/boosts/:id/confirm", post(boosts::confirm))
        .route("/api/bookings", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/api/bookings/:id/status", patch(bookings::update_status))
        .route("/api/bookings/:id/review", post(reviews::submit_review))
        .route("/api/bookings/:id/messages", get(chat::list_messages).post(chat::send_message))
        .route("/api/bookings/:id/chat/ws", get(chat::chat_ws))
        .route("/api/notifications/ws", get(realtime::notifications_ws))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_identity));

    public
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
