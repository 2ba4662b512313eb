use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use crate::infra_memory::InMemoryCredentialStore;

pub const TEST_SIGNING_KEY: &[u8] = b"test-signing-key";

pub fn test_signer() -> Arc<dyn TokenSigner> {
    Arc::new(
        JwtHs512Signer::try_new(JwtConfig {
            access_ttl: DEFAULT_ACCESS_TTL,
            signing_key: TEST_SIGNING_KEY.to_vec(),
        })
        .unwrap(),
    )
}

pub fn test_hasher() -> BcryptRefreshTokenHasher {
    BcryptRefreshTokenHasher::try_with_cost(BCRYPT_MIN_COST).unwrap()
}

pub fn generator_with(
    signer: Arc<dyn TokenSigner>,
    entropy: Arc<dyn EntropySource>,
) -> TokenPairGenerator {
    TokenPairGenerator::new(signer, entropy, Arc::new(test_hasher()))
}

pub fn service_with(store: Arc<dyn CredentialStore>) -> RealTokenService {
    RealTokenService::new(
        store,
        test_signer(),
        Arc::new(OsEntropy),
        Arc::new(test_hasher()),
    )
}

pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), TokenError> {
        Err(TokenError::Entropy("random source unavailable".to_string()))
    }
}

pub struct FailingSigner;

impl TokenSigner for FailingSigner {
    fn sign_access_token(
        &self,
        _subject_id: &SubjectId,
    ) -> Result<(AccessToken, DateTime<Utc>), TokenError> {
        Err(TokenError::Signing("no key".to_string()))
    }
}

/// Wraps a store and fails reads or writes on demand.
pub struct FlakyStore {
    inner: Arc<dyn CredentialStore>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl CredentialStore for FlakyStore {
    async fn get(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CredentialStoreError::Store("connection reset".to_string()));
        }
        self.inner.get(subject_id).await
    }

    async fn set_hash(
        &self,
        subject_id: &SubjectId,
        refresh_token_hash: &str,
    ) -> Result<(), CredentialStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CredentialStoreError::Store("connection reset".to_string()));
        }
        self.inner.set_hash(subject_id, refresh_token_hash).await
    }
}
