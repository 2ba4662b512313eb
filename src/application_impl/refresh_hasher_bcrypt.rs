use crate::application_port::{RefreshToken, RefreshTokenHasher, TokenError};
use tracing::warn;

/// bcrypt only looks at the first 72 bytes of its input.
const BCRYPT_MAX_INPUT: usize = 72;

pub const BCRYPT_MIN_COST: u32 = 4;
pub const BCRYPT_MAX_COST: u32 = 31;

pub struct BcryptRefreshTokenHasher {
    cost: u32,
}

impl BcryptRefreshTokenHasher {
    pub fn new() -> Self {
        BcryptRefreshTokenHasher {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Rejects work factors bcrypt would refuse on every call.
    pub fn try_with_cost(cost: u32) -> Result<Self, TokenError> {
        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
            return Err(TokenError::Hashing(format!(
                "bcrypt cost must be between {} and {}, got {}",
                BCRYPT_MIN_COST, BCRYPT_MAX_COST, cost
            )));
        }
        Ok(BcryptRefreshTokenHasher { cost })
    }
}

impl Default for BcryptRefreshTokenHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RefreshTokenHasher for BcryptRefreshTokenHasher {
    async fn hash_refresh_token(&self, token: &RefreshToken) -> Result<String, TokenError> {
        if token.0.len() > BCRYPT_MAX_INPUT {
            return Err(TokenError::Hashing(format!(
                "input of {} bytes exceeds bcrypt limit",
                token.0.len()
            )));
        }
        let plain = token.0.clone();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .map_err(|e| TokenError::Hashing(e.to_string()))?
            .map_err(|e| TokenError::Hashing(e.to_string()))
    }

    async fn verify_refresh_token(
        &self,
        token: &RefreshToken,
        refresh_token_hash: &str,
    ) -> Result<bool, TokenError> {
        if token.0.len() > BCRYPT_MAX_INPUT {
            return Ok(false);
        }
        let plain = token.0.clone();
        let hash = refresh_token_hash.to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
            .await
            .map_err(|e| TokenError::Hashing(e.to_string()))?;

        match verified {
            Ok(ok) => Ok(ok),
            Err(e) => {
                warn!("stored refresh token hash is unreadable: {}", e);
                Ok(false)
            }
        }
    }
}
