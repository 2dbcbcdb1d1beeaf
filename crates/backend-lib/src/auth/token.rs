// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed bearer tokens (HS256 JWT).
//!
//! Tokens carry everything needed to authenticate a request, so the server
//! keeps no session table. Logout is handled by the revocation registry.
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Default token lifetime (10 hours)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(10 * 60 * 60);

/// Bytes of entropy in a generated signing secret
const GENERATED_SECRET_BYTES: usize = 32;

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Mints and validates bearer tokens with a process-wide secret
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate` so it can be told apart from a bad
        // signature and so a zero lifetime is already expired.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Issuer with a freshly generated random secret
    pub fn with_random_secret(ttl: Duration) -> Self {
        Self::new(&generate_secret(), ttl)
    }

    /// Mint a token for `identity`
    pub fn issue(&self, identity: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: identity.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature and expiry, and optionally the subject
    pub fn validate(&self, token: &str, expected_identity: Option<&str>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::Malformed
            })?
            .claims;

        if Utc::now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        if let Some(expected) = expected_identity {
            if expected != claims.sub {
                return Err(AuthError::IdentityMismatch);
            }
        }

        Ok(claims)
    }
}

/// Read the `exp` claim without checking the signature.
///
/// Only for housekeeping (pruning revoked tokens); never use the result to
/// authenticate anything.
pub fn peek_expiry(token: &str) -> Option<i64> {
    #[derive(Deserialize)]
    struct ExpiryOnly {
        exp: i64,
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    decode::<ExpiryOnly>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims.exp)
}

/// Generate a random signing secret
pub fn generate_secret() -> Vec<u8> {
    let mut secret = vec![0u8; GENERATED_SECRET_BYTES];
    rand::rng().fill_bytes(&mut secret);
    secret
}
