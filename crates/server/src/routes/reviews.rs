use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::info;

use models::{DeleteOutcome, DocumentId, InsertOutcome, NewReview, Review, ReviewPatch, UpdateOutcome};

use crate::auth::{AppState, AuthClaims};
use crate::errors::ApiError;

/// `POST /reviews` (gated). `serviceId` is not checked against the catalog;
/// a dangling reference is permitted.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewReview>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let outcome = state.store.insert_review(input).await?;
    info!(id = %outcome.inserted_id, "inserted review");
    Ok(Json(outcome))
}

/// `GET /reviews`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.store.list_reviews().await?))
}

/// `GET /reviews/:serviceId`, date descending.
pub async fn for_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.store.reviews_for_service(&service_id).await?))
}

/// `GET /myreviews/:userId` (gated), date descending.
pub async fn for_user(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    info!(user_id = %user_id, exp = claims.0.exp, "listing reviews for authenticated user");
    Ok(Json(state.store.reviews_for_user(&user_id).await?))
}

/// `GET /myreview/:id`: a missing document is an empty body, not a 404.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Review>>, ApiError> {
    let id = DocumentId::parse(&id)?;
    Ok(Json(state.store.find_review(&id).await?))
}

/// `PUT /myreview/:id` (gated): upsert on a missing id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ReviewPatch>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = DocumentId::parse(&id)?;
    let outcome = state.store.update_review(&id, patch).await?;
    info!(id = %id, matched = outcome.matched_count, "updated review");
    Ok(Json(outcome))
}

/// `DELETE /myreview/:id` (gated): vacuous success on a missing id.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = DocumentId::parse(&id)?;
    let outcome = state.store.delete_review(&id).await?;
    info!(id = %id, deleted = outcome.deleted_count, "deleted review");
    Ok(Json(outcome))
}
