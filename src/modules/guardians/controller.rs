use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::Guardian;
use sisprof_models::guardians::{CreateGuardianDto, GuardianFilterParams, UpdateGuardianDto};
use sisprof_models::ids::GuardianId;
use tracing::instrument;

use super::service::GuardianService;
use crate::middleware::auth::RequireDirector;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/guardians",
    request_body = CreateGuardianDto,
    responses(
        (status = 201, description = "Guardian created", body = Guardian),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 409, description = "Student already has a guardian"),
        (status = 422, description = "Validation error or unknown student")
    ),
    tag = "Guardians",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_guardian(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<CreateGuardianDto>,
) -> Result<(StatusCode, Json<Guardian>), AppError> {
    let guardian = GuardianService::create_guardian(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(guardian)))
}

#[utoipa::path(
    get,
    path = "/api/guardians",
    params(GuardianFilterParams),
    responses(
        (status = 200, description = "Guardians ordered by name", body = Vec<Guardian>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role")
    ),
    tag = "Guardians",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_guardians(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Query(filters): Query<GuardianFilterParams>,
) -> Result<Json<Vec<Guardian>>, AppError> {
    let guardians = GuardianService::get_guardians(state.store.as_ref(), filters).await?;
    Ok(Json(guardians))
}

#[utoipa::path(
    get,
    path = "/api/guardians/{id}",
    params(("id" = GuardianId, Path, description = "Guardian ID")),
    responses(
        (status = 200, description = "Guardian", body = Guardian),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Guardian not found")
    ),
    tag = "Guardians",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_guardian(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<GuardianId>,
) -> Result<Json<Guardian>, AppError> {
    let guardian = GuardianService::get_guardian(state.store.as_ref(), id).await?;
    Ok(Json(guardian))
}

#[utoipa::path(
    put,
    path = "/api/guardians/{id}",
    params(("id" = GuardianId, Path, description = "Guardian ID")),
    request_body = UpdateGuardianDto,
    responses(
        (status = 200, description = "Guardian updated", body = Guardian),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Guardian not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Guardians",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_guardian(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<GuardianId>,
    ValidatedJson(dto): ValidatedJson<UpdateGuardianDto>,
) -> Result<Json<Guardian>, AppError> {
    let guardian = GuardianService::update_guardian(state.store.as_ref(), id, dto).await?;
    Ok(Json(guardian))
}

#[utoipa::path(
    delete,
    path = "/api/guardians/{id}",
    params(("id" = GuardianId, Path, description = "Guardian ID")),
    responses(
        (status = 204, description = "Guardian deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Guardian not found")
    ),
    tag = "Guardians",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_guardian(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<GuardianId>,
) -> Result<StatusCode, AppError> {
    GuardianService::delete_guardian(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
