use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use service::token::Claims;
use service::{CatalogRepository, TokenService};

/// Shared handles injected into every handler. No ambient/global lookup, so
/// tests substitute the in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogRepository>,
    pub tokens: Arc<TokenService>,
}

/// Verified claims attached to admitted requests.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

/// Bearer-token gate for protected routes.
/// - missing `Authorization` header: 401, the token service is not consulted
/// - present but unverifiable (bad signature, malformed, expired): 403
/// - verified: claims land in request extensions and the handler runs
pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_owned();

    let Some(header) = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        warn!(path = %path, "missing Authorization header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    // `Bearer <token>`: the second whitespace-separated token is the value.
    let bearer = header.split_whitespace().nth(1).unwrap_or_default();

    match state.tokens.verify(bearer) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthClaims(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, err = %e, "token verification failed");
            Err(StatusCode::FORBIDDEN)
        }
    }
}
