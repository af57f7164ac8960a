//! Login identities for person records.
//!
//! A teacher, student or staff record created without `account_id` gets a
//! fresh login: the username is the lower-cased local part of the email (the
//! store appends `1`, `2`, ... on collision) and the password is random. Only
//! the bcrypt hash is stored; the plain password leaves the service once, in
//! the create response.

use sisprof_config::ProvisioningConfig;
use sisprof_core::{AppError, Role, generate_password, hash_password_with_cost};
use sisprof_models::identity::{AccountRequest, ProvisionedCredentials, UserAccount, username_base};
use sisprof_models::value_types::Email;
use sisprof_observability::track_account_provisioned;

/// A provisioning request plus the plain password it was hashed from.
pub struct PendingAccount {
    pub request: AccountRequest,
    password: String,
}

impl PendingAccount {
    /// Credentials to hand back once the store has assigned the final username.
    pub fn into_credentials(self, account: &UserAccount) -> ProvisionedCredentials {
        track_account_provisioned(self.request.role.as_str());
        tracing::info!(
            username = %account.username,
            role = %self.request.role,
            "provisioned login identity"
        );

        ProvisionedCredentials {
            username: account.username.clone(),
            password: self.password,
        }
    }
}

pub struct AccountService;

impl AccountService {
    /// Builds the provisioning request for a new person record.
    pub fn prepare(
        email: &Email,
        role: Role,
        config: &ProvisioningConfig,
    ) -> Result<PendingAccount, AppError> {
        let password = generate_password(config.password_length);
        let password_hash = hash_password_with_cost(&password, config.bcrypt_cost)?;

        Ok(PendingAccount {
            request: AccountRequest {
                base_username: username_base(email),
                email: email.clone(),
                password_hash,
                role,
            },
            password,
        })
    }

    /// `None` when the record links an existing identity.
    pub fn prepare_unless_linked(
        linked: bool,
        email: &Email,
        role: Role,
        config: &ProvisioningConfig,
    ) -> Result<Option<PendingAccount>, AppError> {
        if linked {
            return Ok(None);
        }
        Self::prepare(email, role, config).map(Some)
    }

    /// Pairs the store's provisioned identity with the pending password.
    pub fn finish(
        pending: Option<PendingAccount>,
        account: Option<UserAccount>,
    ) -> Option<ProvisionedCredentials> {
        match (pending, account) {
            (Some(pending), Some(account)) => Some(pending.into_credentials(&account)),
            _ => None,
        }
    }
}

/// Parses an already format-checked email into the value type.
pub fn parse_email(value: &str) -> Result<Email, AppError> {
    Email::new(value).map_err(|e| AppError::invalid_field("email", e.to_string()))
}
