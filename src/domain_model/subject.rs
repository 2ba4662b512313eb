use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the credential owner. Never empty.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("subject id must not be empty")]
pub struct EmptySubjectId;

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Result<Self, EmptySubjectId> {
        let id = id.into();
        if id.is_empty() {
            return Err(EmptySubjectId);
        }
        Ok(SubjectId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SubjectId {
    type Err = EmptySubjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectId::new(s)
    }
}

impl TryFrom<String> for SubjectId {
    type Error = EmptySubjectId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubjectId::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}
