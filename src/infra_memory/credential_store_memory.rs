use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::DashMap;

/// Credential store kept in process memory. Known subjects must be registered up front.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: DashMap<SubjectId, CredentialRecord>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subjects(subjects: impl IntoIterator<Item = SubjectId>) -> Self {
        let store = Self::new();
        for subject_id in subjects {
            store.register_subject(subject_id);
        }
        store
    }

    /// Make a subject known without issuing anything. Existing records are kept.
    pub fn register_subject(&self, subject_id: SubjectId) {
        self.records
            .entry(subject_id.clone())
            .or_insert_with(|| CredentialRecord::unissued(subject_id));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        Ok(self.records.get(subject_id).map(|r| r.value().clone()))
    }

    async fn set_hash(
        &self,
        subject_id: &SubjectId,
        refresh_token_hash: &str,
    ) -> Result<(), CredentialStoreError> {
        self.records.insert(
            subject_id.clone(),
            CredentialRecord {
                subject_id: subject_id.clone(),
                refresh_token_hash: Some(refresh_token_hash.to_string()),
                updated_at: Some(Utc::now()),
            },
        );
        Ok(())
    }
}
