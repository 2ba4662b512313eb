use crate::application_port::*;
use crate::domain_model::SubjectId;
use chrono::{Duration, Utc};

const ACCESS_PREFIX: &str = "fake-access-token:";
const REFRESH_PREFIX: &str = "fake-refresh-token:";

#[derive(Debug, Default)]
pub struct FakeTokenService;

impl FakeTokenService {
    pub fn new() -> Self {
        Self
    }
}

// Deterministic tokens for front-end work. Nothing is stored or signed.
#[async_trait::async_trait]
impl TokenService for FakeTokenService {
    async fn issue(&self, subject_id: &SubjectId) -> Result<TokenPair, TokenError> {
        Ok(get_fake_pair(subject_id))
    }

    async fn rotate(
        &self,
        subject_id: &SubjectId,
        presented: &RefreshToken,
    ) -> Result<TokenPair, TokenError> {
        match presented.0.strip_prefix(REFRESH_PREFIX) {
            Some(subject) if subject == subject_id.as_str() => Ok(get_fake_pair(subject_id)),
            _ => Err(TokenError::InvalidToken),
        }
    }
}

fn get_fake_pair(subject_id: &SubjectId) -> TokenPair {
    TokenPair {
        access_token: AccessToken(format!("{}{}", ACCESS_PREFIX, subject_id)),
        refresh_token: RefreshToken(format!("{}{}", REFRESH_PREFIX, subject_id)),
        access_token_expires_at: Utc::now() + Duration::minutes(15),
    }
}
