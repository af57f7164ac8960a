//! # SisProf Config
//!
//! Configuration types for the SisProf API.
//!
//! Every structure is loaded from environment variables with sensible
//! defaults. `from_env()` reads the process environment; `from_vars()` takes a
//! lookup closure so tests can supply their own values.
//!
//! - [`academic`]: grading rules (`GRADE_BOUND`)
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: record store selection and Postgres connection settings
//! - [`jwt`]: JWT authentication configuration
//! - [`provisioning`]: generated login identities (password length, bcrypt cost)
//! - [`server`]: bind address and metrics port
//!
//! # Example
//!
//! ```ignore
//! use sisprof_config::{DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let database_config = DatabaseConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

use std::str::FromStr;

pub mod academic;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod provisioning;
pub mod server;

// Re-export commonly used types at crate root
pub use academic::{AcademicConfig, GradeBound};
pub use cors::CorsConfig;
pub use database::{DatabaseConfig, StoreBackend};
pub use jwt::JwtConfig;
pub use provisioning::ProvisioningConfig;
pub use server::ServerConfig;

/// Reads `key` through `lookup` and parses it, falling back to `default` when
/// the variable is missing or malformed.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
pub(crate) fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}
