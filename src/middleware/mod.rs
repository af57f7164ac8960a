//! Authentication and role checks.
//!
//! - [`auth`]: the [`auth::AuthUser`] bearer-token extractor and role extractors
//! - [`role`]: route-level role middleware
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the token and exposes its claims
//! 3. Role extractors (`RequireDirector`, ...) refuse callers without the role
//! 4. Services apply ownership rules that need the person record
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireDirector};
//!
//! async fn me(auth_user: AuthUser) -> impl IntoResponse { /* any caller */ }
//!
//! async fn create_class(RequireDirector(auth_user): RequireDirector) -> impl IntoResponse {
//!     // Only directors get here
//! }
//! ```

pub mod auth;
pub mod role;
