use crate::auth::{
    password::{BcryptHasher, CredentialHasher},
    repo::{AccountStore, MemoryAccountStore, PgAccountStore},
    services::RegistrationService,
};
use crate::config::AppConfig;
use crate::db;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registration: RegistrationService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let accounts = match &config.database_url {
            Some(url) => {
                let pool = db::connect(url, config.db_max_connections).await?;
                db::migrate(&pool).await;
                Arc::new(PgAccountStore::new(pool)) as Arc<dyn AccountStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; accounts are kept in memory");
                Arc::new(MemoryAccountStore::new()) as Arc<dyn AccountStore>
            }
        };
        let hasher = Arc::new(BcryptHasher) as Arc<dyn CredentialHasher>;

        Ok(Self::from_parts(accounts, hasher, config.hash_cost))
    }

    pub fn from_parts(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<dyn CredentialHasher>,
        hash_cost: u32,
    ) -> Self {
        Self {
            registration: RegistrationService::new(accounts, hasher, hash_cost),
        }
    }

    /// In-memory accounts and real bcrypt; no database involved.
    #[cfg(test)]
    pub fn fake() -> Self {
        let accounts = Arc::new(MemoryAccountStore::new()) as Arc<dyn AccountStore>;
        let hasher = Arc::new(BcryptHasher) as Arc<dyn CredentialHasher>;
        Self::from_parts(accounts, hasher, crate::config::DEFAULT_HASH_COST)
    }
}
