//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use sisprof_core::roles::{Role, has_role};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: Account ID (subject)
/// - `username`: Login name
/// - `roles`: Roles held by the account
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Account ID (subject claim)
    pub sub: String,
    /// Login name
    pub username: String,
    /// Roles held by the account
    pub roles: Vec<Role>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn account_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn has_role(&self, role: Role) -> bool {
        has_role(&self.roles, role)
    }
}
