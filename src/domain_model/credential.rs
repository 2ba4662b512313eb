use crate::domain_model::SubjectId;
use chrono::{DateTime, Utc};

/// The single refresh-token slot of a subject.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub subject_id: SubjectId,
    pub refresh_token_hash: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState<'a> {
    Unissued,
    Active(&'a str),
}

impl CredentialRecord {
    pub fn unissued(subject_id: SubjectId) -> Self {
        CredentialRecord {
            subject_id,
            refresh_token_hash: None,
            updated_at: None,
        }
    }

    pub fn state(&self) -> CredentialState<'_> {
        match self.refresh_token_hash.as_deref() {
            Some(hash) if !hash.is_empty() => CredentialState::Active(hash),
            _ => CredentialState::Unissued,
        }
    }
}
