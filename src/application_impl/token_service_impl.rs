use crate::application_impl::{GeneratedPair, TokenPairGenerator};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const DECOY_REFRESH_TOKEN: &str = "decoy-refresh-token";

pub struct RealTokenService {
    store: Arc<dyn CredentialStore>,
    generator: TokenPairGenerator,
    hasher: Arc<dyn RefreshTokenHasher>,
    // Verified against when there is no real hash, so a rejection costs the
    // same whether or not the subject exists.
    decoy_hash: OnceCell<String>,
}

impl RealTokenService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        signer: Arc<dyn TokenSigner>,
        entropy: Arc<dyn EntropySource>,
        hasher: Arc<dyn RefreshTokenHasher>,
    ) -> Self {
        Self {
            store,
            generator: TokenPairGenerator::new(signer, entropy, hasher.clone()),
            hasher,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Computes the decoy hash up front so the first rejection is not slower
    /// than the rest.
    pub async fn warm_up(&self) -> Result<(), TokenError> {
        self.decoy_hash().await?;
        Ok(())
    }

    async fn decoy_hash(&self) -> Result<&str, TokenError> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                self.hasher
                    .hash_refresh_token(&RefreshToken(DECOY_REFRESH_TOKEN.to_string()))
                    .await
            })
            .await?;
        Ok(hash.as_str())
    }

    async fn burn_verification(&self, presented: &RefreshToken) -> Result<(), TokenError> {
        let decoy = self.decoy_hash().await?;
        self.hasher.verify_refresh_token(presented, decoy).await?;
        Ok(())
    }

    async fn lookup(&self, subject_id: &SubjectId) -> Result<Option<CredentialRecord>, TokenError> {
        Ok(self.store.get(subject_id).await?)
    }

    /// Generate, then persist or abort. Tokens are only released after the write.
    async fn issue_for(&self, subject_id: &SubjectId) -> Result<TokenPair, TokenError> {
        let GeneratedPair {
            tokens,
            refresh_token_hash,
        } = self.generator.generate(subject_id).await?;

        self.store
            .set_hash(subject_id, &refresh_token_hash)
            .await?;

        Ok(tokens)
    }
}

#[async_trait::async_trait]
impl TokenService for RealTokenService {
    async fn issue(&self, subject_id: &SubjectId) -> Result<TokenPair, TokenError> {
        if self.lookup(subject_id).await?.is_none() {
            debug!(subject = %subject_id, "issue rejected: unknown subject");
            self.burn_verification(&RefreshToken(String::new())).await?;
            return Err(TokenError::UnknownSubject);
        }

        let tokens = self.issue_for(subject_id).await?;
        info!(subject = %subject_id, "issued token pair");
        Ok(tokens)
    }

    async fn rotate(
        &self,
        subject_id: &SubjectId,
        presented: &RefreshToken,
    ) -> Result<TokenPair, TokenError> {
        let Some(record) = self.lookup(subject_id).await? else {
            debug!(subject = %subject_id, "rotate rejected: unknown subject");
            self.burn_verification(presented).await?;
            return Err(TokenError::UnknownSubject);
        };

        let verified = match record.state() {
            CredentialState::Active(hash) => {
                self.hasher.verify_refresh_token(presented, hash).await?
            }
            CredentialState::Unissued => {
                self.burn_verification(presented).await?;
                false
            }
        };
        if !verified {
            debug!(subject = %subject_id, "rotate rejected: refresh token mismatch");
            return Err(TokenError::InvalidToken);
        }

        let tokens = self.issue_for(subject_id).await?;
        info!(subject = %subject_id, "rotated token pair");
        Ok(tokens)
    }
}
