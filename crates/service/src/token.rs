use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Signed claims: the caller-supplied identity payload (shape not validated)
/// flattened alongside issuance/expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    pub iat: i64,
    pub exp: i64,
}

/// Stateless HS256 token service. Expiry is enforced purely by the signed
/// timestamp, so verification is a pure function of token and secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Default one-hour lifetime.
    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::hours(1))
    }

    /// Sign an arbitrary identity payload with embedded `iat`/`exp`.
    pub fn issue(&self, identity: Map<String, Value>) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            identity,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decode and validate a presented token. Bad signature, malformed input,
    /// and expiry all collapse into `TokenError::Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                debug!(err = %e, "token verification failed");
                Err(TokenError::Invalid(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("email".into(), Value::String(email.into()));
        m
    }

    #[test]
    fn issue_then_verify_returns_claims() {
        let svc = TokenService::with_default_ttl("test-secret");
        let token = svc.issue(identity("a@b.com")).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.identity.get("email").unwrap(), "a@b.com");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let svc = TokenService::with_default_ttl("test-secret");
        assert!(matches!(svc.verify("not.a.token"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let issuer = TokenService::with_default_ttl("secret-a");
        let verifier = TokenService::with_default_ttl("secret-b");
        let token = issuer.issue(identity("a@b.com")).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_invalid() {
        let svc = TokenService::new("test-secret", Duration::seconds(-120));
        let token = svc.issue(identity("a@b.com")).unwrap();
        assert!(matches!(svc.verify(&token), Err(TokenError::Invalid(_))));
    }
}
