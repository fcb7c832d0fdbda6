use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::auth::repo_types::{Account, NewAccount};

/// Failure of [`AccountStore::insert`].
#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    /// A unique index on username or email rejected the row.
    #[error("duplicate account: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Any account whose username or email matches.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> anyhow::Result<Option<Account>>;

    async fn insert(&self, account: NewAccount) -> Result<Account, InsertError>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, fullname, username, email, password_hash, gender, birthdate,
                   avatar_url, is_online, coins, level, created_at, updated_at
            FROM accounts
            WHERE username = $1 OR email = $2
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, InsertError> {
        let res = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (fullname, username, email, password_hash, gender, birthdate,
                                  avatar_url, is_online, coins, level, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, fullname, username, email, password_hash, gender, birthdate,
                      avatar_url, is_online, coins, level, created_at, updated_at
            "#,
        )
        .bind(&account.fullname)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.gender)
        .bind(account.birthdate)
        .bind(&account.avatar_url)
        .bind(account.is_online)
        .bind(account.coins)
        .bind(account.level)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let constraint = db_err.constraint().unwrap_or("accounts").to_string();
                debug!(%constraint, "insert hit unique index");
                Err(InsertError::Duplicate(constraint))
            }
            Err(e) => Err(InsertError::Other(e.into())),
        }
    }
}

/// Process-local store. Enforces the same uniqueness rules as the
/// `accounts` table indexes.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> anyhow::Result<Option<Account>> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| anyhow::anyhow!("account store poisoned"))?;
        Ok(accounts
            .iter()
            .find(|a| a.username == username || a.email == email)
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, InsertError> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| anyhow::anyhow!("account store poisoned"))?;
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(InsertError::Duplicate("accounts_username_key".into()));
        }
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(InsertError::Duplicate("accounts_email_key".into()));
        }
        let account = account.into_account(Uuid::new_v4());
        accounts.push(account.clone());
        Ok(account)
    }
}
