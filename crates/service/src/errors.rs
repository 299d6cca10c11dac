use thiserror::Error;

use crate::token::TokenError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(String),
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Store(e.to_string())
    }
}
