use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::auth::{self, AppState};

pub mod reviews;
pub mod services;
pub mod token;

pub async fn welcome() -> &'static str {
    "Welcome to Maya's Kitchen server!"
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, the token endpoint, and
/// the bearer-gated writes/private reads.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/jwt", post(token::issue))
        .route("/home/services", get(services::home_list))
        .route("/services", get(services::list))
        .route("/service/:id", get(services::get_one))
        .route("/reviews", get(reviews::list))
        .route("/reviews/:service_id", get(reviews::for_service))
        .route("/myreview/:id", get(reviews::get_one));

    // One gate instance guards every protected route.
    let protected = Router::new()
        .route("/services", post(services::create))
        .route("/reviews", post(reviews::create))
        .route("/myreviews/:user_id", get(reviews::for_user))
        .route("/myreview/:id", put(reviews::update).delete(reviews::remove))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
