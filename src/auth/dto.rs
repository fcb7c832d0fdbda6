use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::auth::repo_types::Account;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Request body for registration. Every field is optional here; the
/// service decides what counts as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<String>,
}

/// Response returned after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: PublicAccount,
}

/// Account as shown to clients: every column except `password_hash`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub gender: String,
    #[serde(with = "iso_date")]
    pub birthdate: Date,
    pub avatar_url: String,
    pub is_online: bool,
    pub coins: i32,
    pub level: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            fullname: a.fullname,
            username: a.username,
            email: a.email,
            gender: a.gender,
            birthdate: a.birthdate,
            avatar_url: a.avatar_url,
            is_online: a.is_online,
            coins: a.coins,
            level: a.level,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}
