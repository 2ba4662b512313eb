use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

// Row alias form; `VALUES(col)` in the update clause is deprecated since MySQL 8.0.20.
const UPSERT_HASH_SQL: &str = r#"
INSERT INTO subject_credential (subject_id, refresh_token_hash, updated_at)
VALUES (?, ?, UTC_TIMESTAMP(6)) AS incoming
ON DUPLICATE KEY UPDATE
    refresh_token_hash = incoming.refresh_token_hash,
    updated_at = incoming.updated_at
"#;

/// Rows live in `subject_credential` (see `schema/subject_credential.sql`).
/// Subjects are provisioned by user management with a NULL hash.
pub struct MySqlCredentialStore {
    pool: MySqlPool,
}

impl MySqlCredentialStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlCredentialStore { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<CredentialRecord, CredentialStoreError> {
        let subject_id: String = row
            .try_get("subject_id")
            .map_err(|e| CredentialStoreError::Decode(e.to_string()))?;
        let subject_id =
            SubjectId::new(subject_id).map_err(|e| CredentialStoreError::Decode(e.to_string()))?;

        let refresh_token_hash: Option<String> = row
            .try_get("refresh_token_hash")
            .map_err(|e| CredentialStoreError::Decode(e.to_string()))?;
        let updated_at: Option<DateTime<Utc>> = row
            .try_get("updated_at")
            .map_err(|e| CredentialStoreError::Decode(e.to_string()))?;

        Ok(CredentialRecord {
            subject_id,
            refresh_token_hash,
            updated_at,
        })
    }
}

#[async_trait::async_trait]
impl CredentialStore for MySqlCredentialStore {
    async fn get(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT subject_id, refresh_token_hash, updated_at
FROM subject_credential
WHERE subject_id = ?
"#,
        )
        .bind(subject_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn set_hash(
        &self,
        subject_id: &SubjectId,
        refresh_token_hash: &str,
    ) -> Result<(), CredentialStoreError> {
        // Single statement: the row is the atomicity boundary, last write wins.
        sqlx::query(UPSERT_HASH_SQL)
        .bind(subject_id.as_str())
        .bind(refresh_token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Store(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_reads_new_values_through_row_alias() {
        assert!(UPSERT_HASH_SQL.contains("AS incoming"));
        assert!(UPSERT_HASH_SQL.contains("refresh_token_hash = incoming.refresh_token_hash"));
        assert!(!UPSERT_HASH_SQL.contains("VALUES(refresh_token_hash)"));
        assert_eq!(UPSERT_HASH_SQL.matches('?').count(), 2);
    }
}
