use anyhow::Context;
use async_trait::async_trait;
use tracing::error;

/// One-way credential transformation.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plain: &str, cost: u32) -> anyhow::Result<String>;
}

/// bcrypt on the blocking pool; a cost-10 hash takes tens of milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptHasher;

#[async_trait]
impl CredentialHasher for BcryptHasher {
    async fn hash(&self, plain: &str, cost: u32) -> anyhow::Result<String> {
        let plain = plain.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .context("bcrypt task")?
            .map_err(|e| {
                error!(error = %e, "bcrypt hash error");
                anyhow::anyhow!(e.to_string())
            })
    }
}
