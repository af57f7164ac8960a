//! Director accounts.
//!
//! Directors are never provisioned through the API; the first one is created
//! here.

use anyhow::{Context, bail};
use sisprof_core::{Role, hash_password_with_cost};
use sisprof_db::Store;
use sisprof_models::ids::AccountId;
use sisprof_models::{Email, NewAccount, UserAccount};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn create_director(
    store: &dyn Store,
    username: &str,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> anyhow::Result<UserAccount> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        bail!("username cannot be empty");
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!("password must be at least {MIN_PASSWORD_LENGTH} characters");
    }
    let email = Email::new(email)?;

    if store
        .find_account_by_username(&username)
        .await
        .map_err(|err| err.error)?
        .is_some()
    {
        bail!("username '{username}' is already taken");
    }

    let password_hash =
        hash_password_with_cost(password, bcrypt_cost).map_err(|err| err.error)?;

    let account = store
        .insert_account(&NewAccount {
            id: AccountId::new(),
            username,
            email,
            password_hash,
            roles: vec![Role::Director],
        })
        .await
        .map_err(|err| err.error)
        .context("failed to store the director account")?;

    tracing::info!(username = %account.username, "director account created");
    Ok(account)
}
