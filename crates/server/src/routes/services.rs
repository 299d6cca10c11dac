use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use models::{DocumentId, InsertOutcome, NewService, ServiceItem};

use crate::auth::AppState;
use crate::errors::ApiError;

/// `GET /home/services`: the three newest catalog entries.
pub async fn home_list(State(state): State<AppState>) -> Result<Json<Vec<ServiceItem>>, ApiError> {
    Ok(Json(state.store.list_services(Some(3)).await?))
}

/// `GET /services`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ServiceItem>>, ApiError> {
    Ok(Json(state.store.list_services(None).await?))
}

/// `GET /service/:id`: a missing document is an empty body, not a 404.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<ServiceItem>>, ApiError> {
    let id = DocumentId::parse(&id)?;
    Ok(Json(state.store.find_service(&id).await?))
}

/// `POST /services` (gated)
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewService>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let outcome = state.store.insert_service(input).await?;
    info!(id = %outcome.inserted_id, "inserted service");
    Ok(Json(outcome))
}
