use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::SubjectId;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::Settings;
use anyhow::{Context, anyhow};
use sqlx::{MySql, Pool};
use std::sync::Arc;
use std::time::Duration;

/// Everything built once at startup and shared read-only by request handlers.
pub struct Server {
    pub token_service: Arc<dyn TokenService>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let mut pool = None;
        let credential_store: Arc<dyn CredentialStore> = match settings.store.backend.as_str() {
            "memory" => {
                let subjects = settings
                    .store
                    .seed_subjects
                    .iter()
                    .map(|s| SubjectId::new(s.as_str()))
                    .collect::<Result<Vec<_>, _>>()?;
                info!(subjects = subjects.len(), "using in-memory credential store");
                Arc::new(InMemoryCredentialStore::with_subjects(subjects))
            }
            "mysql" => {
                let dsn = settings
                    .store
                    .mysql_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow!("store.mysql_dsn is required for the mysql backend"))?;
                let mysql = Pool::<MySql>::connect(dsn)
                    .await
                    .context("connecting to mysql")?;
                sqlx::query("SELECT 1")
                    .execute(&mysql)
                    .await
                    .context("pinging mysql")?;
                info!("using mysql credential store");
                pool = Some(mysql.clone());
                Arc::new(MySqlCredentialStore::new(mysql))
            }
            other => return Err(anyhow!("Unknown store backend: {}", other)),
        };

        let token_service: Arc<dyn TokenService> = match settings.auth.backend.as_str() {
            "fake" => {
                warn!("fake token service enabled; tokens are not signed");
                Arc::new(FakeTokenService::new())
            }
            "real" => {
                if settings.auth.signing_key.is_empty() {
                    return Err(anyhow!(
                        "auth.signing_key is not configured (set TOKENPAIR_AUTH__SIGNING_KEY)"
                    ));
                }
                let signer: Arc<dyn TokenSigner> = Arc::new(JwtHs512Signer::try_new(JwtConfig {
                    access_ttl: Duration::from_secs(settings.auth.access_ttl_secs),
                    signing_key: settings.auth.signing_key.clone().into_bytes(),
                })?);
                let entropy: Arc<dyn EntropySource> = Arc::new(OsEntropy);
                let hasher: Arc<dyn RefreshTokenHasher> = Arc::new(
                    BcryptRefreshTokenHasher::try_with_cost(settings.auth.bcrypt_cost)?,
                );
                let service = RealTokenService::new(credential_store, signer, entropy, hasher);
                service.warm_up().await.context("preparing token service")?;
                Arc::new(service)
            }
            other => return Err(anyhow!("Unknown auth backend: {}", other)),
        };

        info!("server started");

        Ok(Self {
            token_service,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("mysql pool closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Auth, Http, Log, Store};

    fn settings(auth_backend: &str, signing_key: &str, store_backend: &str) -> Settings {
        Settings {
            auth: Auth {
                backend: auth_backend.to_string(),
                signing_key: signing_key.to_string(),
                access_ttl_secs: 900,
                bcrypt_cost: 4,
            },
            http: Http {
                address: "127.0.0.1:0".to_string(),
                cert_path: None,
                key_path: None,
            },
            log: Log {
                filter: "info".to_string(),
            },
            store: Store {
                backend: store_backend.to_string(),
                mysql_dsn: None,
                seed_subjects: vec!["u1".to_string()],
            },
        }
    }

    #[tokio::test]
    async fn missing_signing_key_is_fatal() {
        assert!(Server::try_new(&settings("real", "", "memory")).await.is_err());
    }

    #[tokio::test]
    async fn out_of_range_bcrypt_cost_is_fatal() {
        for cost in [3, 32] {
            let mut bad = settings("real", "k", "memory");
            bad.auth.bcrypt_cost = cost;
            assert!(Server::try_new(&bad).await.is_err(), "cost {cost}");
        }
    }

    #[tokio::test]
    async fn unknown_backends_are_fatal() {
        assert!(Server::try_new(&settings("magic", "k", "memory")).await.is_err());
        assert!(Server::try_new(&settings("real", "k", "files")).await.is_err());
        assert!(Server::try_new(&settings("real", "k", "mysql")).await.is_err());
    }

    #[tokio::test]
    async fn memory_backend_knows_seeded_subjects() {
        let server = Server::try_new(&settings("real", "k", "memory")).await.unwrap();
        let known = SubjectId::new("u1").unwrap();
        let unknown = SubjectId::new("u2").unwrap();

        server.token_service.issue(&known).await.unwrap();
        assert!(matches!(
            server.token_service.issue(&unknown).await,
            Err(TokenError::UnknownSubject)
        ));
        server.shutdown().await;
    }
}
