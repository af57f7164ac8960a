//! Route-level role middleware.
//!
//! Handler families that are gated by a single role as a whole (finance) use
//! these as a `route_layer` instead of repeating the extractor on every
//! handler.
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::role::require_director;
//!
//! let finance = init_finance_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_director));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use sisprof_core::{AppError, Role};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Lets the request through only when the caller holds one of `allowed_roles`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !auth_user.has_any_role(allowed_roles) {
        sisprof_observability::track_access_denied(parts.uri.path());
        let names: Vec<&str> = allowed_roles.iter().map(|role| role.as_str()).collect();
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {}",
            names.join(" or ")
        )));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_director(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Director]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
