use crate::domain_model::SubjectId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("unknown subject")]
    UnknownSubject,
    #[error("invalid token")]
    InvalidToken,
    #[error("signing error: {0}")]
    Signing(String),
    #[error("entropy error: {0}")]
    Entropy(String),
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl TokenError {
    /// Caller-side authentication failures. These must look the same from outside.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TokenError::UnknownSubject | TokenError::InvalidToken)
    }

    pub fn is_internal(&self) -> bool {
        !self.is_unauthorized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken(pub String);

/// Plaintext refresh token. Only ever handed to the caller, never stored.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RefreshToken(pub String);

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
}

pub trait TokenSigner: Send + Sync {
    fn sign_access_token(
        &self,
        subject_id: &SubjectId,
    ) -> Result<(AccessToken, DateTime<Utc>), TokenError>;
}

/// Source of secret random bytes. Implementations must fail rather than degrade.
pub trait EntropySource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), TokenError>;
}

#[async_trait::async_trait]
pub trait RefreshTokenHasher: Send + Sync {
    async fn hash_refresh_token(&self, token: &RefreshToken) -> Result<String, TokenError>;
    /// `Ok(false)` on mismatch, including a stored hash that cannot be parsed.
    async fn verify_refresh_token(
        &self,
        token: &RefreshToken,
        refresh_token_hash: &str,
    ) -> Result<bool, TokenError>;
}

#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    /// Issue a fresh pair, superseding whatever refresh token the subject held.
    async fn issue(&self, subject_id: &SubjectId) -> Result<TokenPair, TokenError>;
    /// Exchange the current refresh token for a fresh pair.
    async fn rotate(
        &self,
        subject_id: &SubjectId,
        presented: &RefreshToken,
    ) -> Result<TokenPair, TokenError>;
}
