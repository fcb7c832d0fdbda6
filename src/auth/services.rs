use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};
use tracing::{error, info, instrument, warn};

use crate::auth::{
    dto::{PublicAccount, RegisterRequest, RegisterResponse},
    password::CredentialHasher,
    repo::{AccountStore, InsertError},
    repo_types::NewAccount,
};

pub const REGISTER_SUCCESS: &str = "Register success";
pub const MISSING_FIELDS: &str = "Missing required fields";
pub const INVALID_USERNAME: &str = "Username is invalid";
pub const INVALID_EMAIL: &str = "Email is invalid";
pub const PASSWORD_TOO_SHORT: &str = "Password is too short";
pub const FULLNAME_TOO_LONG: &str = "Fullname is too long";
pub const INVALID_BIRTHDATE: &str = "Birthdate is invalid";
pub const FUTURE_BIRTHDATE: &str = "Birthdate cannot be in the future";
pub const ACCOUNT_EXISTS: &str = "Username or email already exists";

const MIN_PASSWORD_LEN: usize = 6;
const MAX_FULLNAME_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    /// Collaborator failure, displayed with the collaborator's own message.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,20}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its UTC date is kept).
pub(crate) fn parse_birthdate(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(raw, &Rfc3339)
                .ok()
                .map(|dt| dt.to_offset(UtcOffset::UTC).date())
        })
}

/// Registration input that passed every format check.
#[derive(Debug)]
struct ValidRegistration {
    fullname: String,
    username: String,
    email: String,
    password: String,
    gender: String,
    birthdate: Date,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// Format checks in fixed order; the first failure wins.
fn validate(input: RegisterRequest, today: Date) -> Result<ValidRegistration, RegisterError> {
    let (
        Some(fullname),
        Some(username),
        Some(email),
        Some(password),
        Some(gender),
        Some(birthdate),
    ) = (
        present(input.fullname),
        present(input.username),
        present(input.email),
        present(input.password),
        present(input.gender),
        present(input.birthdate),
    ) else {
        return Err(RegisterError::Validation(MISSING_FIELDS));
    };

    if !is_valid_username(&username) {
        return Err(RegisterError::Validation(INVALID_USERNAME));
    }
    if !is_valid_email(&email) {
        return Err(RegisterError::Validation(INVALID_EMAIL));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegisterError::Validation(PASSWORD_TOO_SHORT));
    }
    if fullname.chars().count() > MAX_FULLNAME_LEN {
        return Err(RegisterError::Validation(FULLNAME_TOO_LONG));
    }
    let birthdate =
        parse_birthdate(&birthdate).ok_or(RegisterError::Validation(INVALID_BIRTHDATE))?;
    if birthdate > today {
        return Err(RegisterError::Validation(FUTURE_BIRTHDATE));
    }

    Ok(ValidRegistration {
        fullname,
        username,
        email,
        password,
        gender,
        birthdate,
    })
}

#[derive(Clone)]
pub struct RegistrationService {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
    hash_cost: u32,
}

impl RegistrationService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<dyn CredentialHasher>,
        hash_cost: u32,
    ) -> Self {
        Self {
            accounts,
            hasher,
            hash_cost,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        input: RegisterRequest,
    ) -> Result<RegisterResponse, RegisterError> {
        let now = OffsetDateTime::now_utc();
        let valid = validate(input, now.date()).map_err(|e| {
            warn!(reason = %e, "registration rejected");
            e
        })?;

        let existing = self
            .accounts
            .find_by_username_or_email(&valid.username, &valid.email)
            .await
            .map_err(|e| {
                error!(error = %e, "account lookup failed");
                e
            })?;
        if existing.is_some() {
            warn!(username = %valid.username, email = %valid.email, "username or email taken");
            return Err(RegisterError::Conflict(ACCOUNT_EXISTS));
        }

        let password_hash = self
            .hasher
            .hash(&valid.password, self.hash_cost)
            .await
            .map_err(|e| {
                error!(error = %e, "credential hashing failed");
                e
            })?;

        let draft = NewAccount::new(
            valid.fullname,
            valid.username,
            valid.email,
            password_hash,
            valid.gender,
            valid.birthdate,
            now,
        );

        let account = match self.accounts.insert(draft).await {
            Ok(a) => a,
            Err(InsertError::Duplicate(constraint)) => {
                warn!(%constraint, "account created concurrently");
                return Err(RegisterError::Conflict(ACCOUNT_EXISTS));
            }
            Err(InsertError::Other(e)) => {
                error!(error = %e, "insert account failed");
                return Err(RegisterError::Internal(e));
            }
        };

        info!(account_id = %account.id, username = %account.username, "account registered");
        Ok(RegisterResponse {
            message: REGISTER_SUCCESS,
            user: PublicAccount::from(account),
        })
    }
}
