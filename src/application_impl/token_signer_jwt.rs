use crate::application_port::{AccessToken, TokenError, TokenSigner};
use crate::domain_model::SubjectId;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Clone)]
pub struct JwtConfig {
    pub access_ttl: Duration,
    pub signing_key: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

pub struct JwtHs512Signer {
    access_ttl: Duration,
    key: EncodingKey,
}

impl JwtHs512Signer {
    pub fn try_new(cfg: JwtConfig) -> Result<Self, TokenError> {
        if cfg.signing_key.is_empty() {
            return Err(TokenError::Signing("signing key is empty".to_string()));
        }
        Ok(JwtHs512Signer {
            access_ttl: cfg.access_ttl,
            key: EncodingKey::from_secret(&cfg.signing_key),
        })
    }
}

impl TokenSigner for JwtHs512Signer {
    fn sign_access_token(
        &self,
        subject_id: &SubjectId,
    ) -> Result<(AccessToken, DateTime<Utc>), TokenError> {
        let iat_dt = Utc::now();
        let exp_dt = iat_dt + self.access_ttl;
        let claims = AccessClaims {
            sub: subject_id.to_string(),
            exp: exp_dt.timestamp(),
            iat: iat_dt.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS512), &claims, &self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok((AccessToken(token), exp_dt))
    }
}
