use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use sisprof_auth::{Claims, verify_token};
use sisprof_core::{AppError, Role};
use sisprof_models::ids::AccountId;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.0.has_role(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    pub fn is_director(&self) -> bool {
        self.has_role(Role::Director)
    }

    pub fn account_id(&self) -> Result<AccountId, AppError> {
        self.0
            .account_id()
            .map(AccountId::from_uuid)
            .ok_or_else(|| AppError::unauthorized("Invalid account ID in token"))
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that admits callers holding any of the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = sisprof_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                let allowed = [$($role),+];

                if !auth_user.has_any_role(&allowed) {
                    sisprof_observability::track_access_denied(stringify!($name));
                    let names: Vec<&str> = allowed.iter().map(|role| role.as_str()).collect();
                    return Err(sisprof_core::AppError::forbidden(format!(
                        "Access denied. Required role: {}",
                        names.join(" or ")
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_roles!(RequireDirector, [Role::Director]);
require_roles!(RequireDirectorOrTeacher, [Role::Director, Role::Teacher]);
