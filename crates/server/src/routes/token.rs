use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use service::errors::ServiceError;

use crate::auth::AppState;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct TokenOutput {
    pub token: String,
}

/// `POST /jwt`: sign whatever identity payload the caller supplies.
pub async fn issue(
    State(state): State<AppState>,
    Json(identity): Json<Map<String, Value>>,
) -> Result<Json<TokenOutput>, ApiError> {
    let token = state.tokens.issue(identity).map_err(ServiceError::from)?;
    info!("issued access token");
    Ok(Json(TokenOutput { token }))
}
