use axum::{Json, extract::State};
use sisprof_core::AppError;
use sisprof_models::SchoolSettings;
use sisprof_models::settings::UpdateSettingsDto;
use tracing::instrument;

use super::service::SettingsService;
use crate::middleware::auth::{AuthUser, RequireDirector};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "School name and current school year", body = SchoolSettings),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<SchoolSettings>, AppError> {
    let settings = SettingsService::get_settings(state.store.as_ref()).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Settings updated", body = SchoolSettings),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 422, description = "Validation error")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_settings(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<UpdateSettingsDto>,
) -> Result<Json<SchoolSettings>, AppError> {
    let settings = SettingsService::update_settings(state.store.as_ref(), dto).await?;
    Ok(Json(settings))
}
