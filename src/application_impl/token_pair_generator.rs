use crate::application_port::*;
use crate::domain_model::SubjectId;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;

pub const REFRESH_TOKEN_BYTES: usize = 32;

/// A fresh pair plus the hash to persist for its refresh token.
pub struct GeneratedPair {
    pub tokens: TokenPair,
    pub refresh_token_hash: String,
}

/// Builds token pairs. Pure computation, never touches the credential store.
pub struct TokenPairGenerator {
    signer: Arc<dyn TokenSigner>,
    entropy: Arc<dyn EntropySource>,
    hasher: Arc<dyn RefreshTokenHasher>,
}

impl TokenPairGenerator {
    pub fn new(
        signer: Arc<dyn TokenSigner>,
        entropy: Arc<dyn EntropySource>,
        hasher: Arc<dyn RefreshTokenHasher>,
    ) -> Self {
        Self {
            signer,
            entropy,
            hasher,
        }
    }

    pub async fn generate(&self, subject_id: &SubjectId) -> Result<GeneratedPair, TokenError> {
        let (access_token, access_token_expires_at) =
            self.signer.sign_access_token(subject_id)?;
        let refresh_token = self.new_refresh_token()?;
        let refresh_token_hash = self.hasher.hash_refresh_token(&refresh_token).await?;

        Ok(GeneratedPair {
            tokens: TokenPair {
                access_token,
                refresh_token,
                access_token_expires_at,
            },
            refresh_token_hash,
        })
    }

    fn new_refresh_token(&self) -> Result<RefreshToken, TokenError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        self.entropy.fill(&mut bytes)?;
        Ok(RefreshToken(STANDARD.encode(bytes)))
    }
}
