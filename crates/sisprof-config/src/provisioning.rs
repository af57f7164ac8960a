use crate::{env_lookup, parse_or};

const DEFAULT_BCRYPT_COST: u32 = 12;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Settings for login identities created automatically with a person record.
#[derive(Clone, Debug)]
pub struct ProvisioningConfig {
    /// Length of generated passwords.
    pub password_length: usize,
    pub bcrypt_cost: u32,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            password_length: 10,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl ProvisioningConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            password_length: parse_or(&lookup, "PROVISIONING_PASSWORD_LENGTH", defaults.password_length)
                .max(8),
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", defaults.bcrypt_cost)
                .clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }
}
