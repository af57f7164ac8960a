//! # SisProf Auth
//!
//! Authentication types and JWT utilities for the SisProf API.
//!
//! - [`claims`]: the access token claim structure
//! - [`jwt`]: token creation and verification
//!
//! Access tokens carry the account id, the login name and the caller's roles,
//! so role gates are decided without a store lookup. Ownership checks (is this
//! teacher the one who owns the lesson?) still resolve the person record.
//!
//! # Example
//!
//! ```ignore
//! use sisprof_auth::{create_access_token, verify_token};
//! use sisprof_config::JwtConfig;
//! use sisprof_core::Role;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(account_id, "joao", vec![Role::Teacher], &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert!(claims.has_role(Role::Teacher));
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
