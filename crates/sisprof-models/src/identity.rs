//! Login identities and authentication DTOs.
//!
//! Teachers, students and staff are linked one-to-one to a [`UserAccount`].
//! When a record is created without one, an identity is provisioned: the
//! login name comes from the email's local part and collisions get an
//! increasing numeric suffix (`joao`, `joao1`, `joao2`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sisprof_core::Role;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::AccountId;
use crate::value_types::Email;

/// A login identity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserAccount {
    pub id: AccountId,
    pub username: String,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn has_role(&self, role: Role) -> bool {
        sisprof_core::roles::has_role(&self.roles, role)
    }
}

/// A fully specified identity, inserted as-is.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub username: String,
    pub email: Email,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// Asks the store to provision an identity together with a person record.
///
/// The store picks the first free name from `base_username` inside the same
/// transaction that inserts the record.
#[derive(Clone)]
pub struct AccountRequest {
    pub base_username: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
}

impl std::fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRequest")
            .field("base_username", &self.base_username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Lower-cased local part of the email address.
pub fn username_base(email: &Email) -> String {
    email.local_part().to_lowercase()
}

/// First name of the sequence `base`, `base1`, `base2`, ... that is not taken.
pub fn next_available_username<S: AsRef<str>>(base: &str, taken: &[S]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|name| name.as_ref() == candidate);

    if !is_taken(base) {
        return base.to_string();
    }

    let mut suffix: u64 = 1;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Username and plaintext password of a freshly provisioned identity.
///
/// Returned once in the create response and never stored or logged.
#[derive(Clone, Serialize, ToSchema)]
pub struct ProvisionedCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ProvisionedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionedCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: UserAccount,
}

/// The caller's identity as seen by `GET /api/auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentAccount {
    pub account: UserAccount,
    /// Display labels of the held roles.
    pub groups: Vec<String>,
}
