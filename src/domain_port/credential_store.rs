use crate::application_port::*;
use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("store error: {0}")]
    Store(String),
    #[error("malformed record: {0}")]
    Decode(String),
}

impl From<CredentialStoreError> for TokenError {
    fn from(error: CredentialStoreError) -> Self {
        TokenError::Persistence(error.to_string())
    }
}

/// Maps a subject to the hash of its current refresh token.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the record of a known subject. `None` means the subject does not exist.
    async fn get(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError>;

    /// Replace the stored hash, creating the record if needed. Last write wins.
    async fn set_hash(
        &self,
        subject_id: &SubjectId,
        refresh_token_hash: &str,
    ) -> Result<(), CredentialStoreError>;
}
