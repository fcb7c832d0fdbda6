use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Account record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash, not exposed in JSON
    pub gender: String,
    pub birthdate: Date,
    pub avatar_url: String,
    pub is_online: bool,
    pub coins: i32,
    pub level: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Account about to be inserted; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub gender: String,
    pub birthdate: Date,
    pub avatar_url: String,
    pub is_online: bool,
    pub coins: i32,
    pub level: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl NewAccount {
    pub const DEFAULT_AVATAR_URL: &'static str = "";
    pub const DEFAULT_COINS: i32 = 0;
    pub const DEFAULT_LEVEL: i32 = 1;

    /// Fills the optional columns with their defaults and stamps both
    /// timestamps with `now`.
    pub fn new(
        fullname: String,
        username: String,
        email: String,
        password_hash: String,
        gender: String,
        birthdate: Date,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            fullname,
            username,
            email,
            password_hash,
            gender,
            birthdate,
            avatar_url: Self::DEFAULT_AVATAR_URL.to_string(),
            is_online: false,
            coins: Self::DEFAULT_COINS,
            level: Self::DEFAULT_LEVEL,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_account(self, id: Uuid) -> Account {
        Account {
            id,
            fullname: self.fullname,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            gender: self.gender,
            birthdate: self.birthdate,
            avatar_url: self.avatar_url,
            is_online: self.is_online,
            coins: self.coins,
            level: self.level,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn new_account_applies_defaults() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let draft = NewAccount::new(
            "Test User".into(),
            "testuser".into(),
            "test@example.com".into(),
            "$2b$10$hash".into(),
            "male".into(),
            date!(2000-01-01),
            now,
        );
        assert_eq!(draft.avatar_url, "");
        assert!(!draft.is_online);
        assert_eq!(draft.coins, 0);
        assert_eq!(draft.level, 1);
        assert_eq!(draft.created_at, now);
        assert_eq!(draft.updated_at, now);
    }

    #[test]
    fn account_json_omits_password_hash() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let account = NewAccount::new(
            "Test User".into(),
            "testuser".into(),
            "test@example.com".into(),
            "$2b$10$hash".into(),
            "female".into(),
            date!(1999-12-31),
            now,
        )
        .into_account(Uuid::new_v4());

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("testuser"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$10$hash"));
    }
}
