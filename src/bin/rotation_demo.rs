use std::sync::Arc;
use tokenpair::application_impl::*;
use tokenpair::application_port::*;
use tokenpair::domain_model::SubjectId;
use tokenpair::infra_memory::InMemoryCredentialStore;
use tokenpair::logger::*;

// Walks one subject through issue, rotate and a replayed rotate.
// $ cargo run --bin rotation_demo
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.reload_from_config(&LogConfig {
        filter: "debug".to_string(),
    })?;

    let subject = SubjectId::new("u1")?;
    let store = Arc::new(InMemoryCredentialStore::with_subjects([subject.clone()]));
    let signer = Arc::new(JwtHs512Signer::try_new(JwtConfig {
        access_ttl: DEFAULT_ACCESS_TTL,
        signing_key: b"demo-signing-key".to_vec(),
    })?);
    let service = RealTokenService::new(
        store,
        signer,
        Arc::new(OsEntropy),
        Arc::new(BcryptRefreshTokenHasher::new()),
    );

    let first = service.issue(&subject).await?;
    info!(expires_at = %first.access_token_expires_at, "issued");

    let second = service.rotate(&subject, &first.refresh_token).await?;
    info!(expires_at = %second.access_token_expires_at, "rotated");

    match service.rotate(&subject, &first.refresh_token).await {
        Err(e) => info!("replay rejected: {}", e),
        Ok(_) => error!("replay accepted"),
    }

    let unknown = SubjectId::new("unknown-subject")?;
    if let Err(e) = service.issue(&unknown).await {
        info!("unknown subject rejected: {}", e);
    }

    Ok(())
}
