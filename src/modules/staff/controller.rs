use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::Staff;
use sisprof_models::ids::StaffId;
use sisprof_models::staff::{CreateStaffDto, StaffCreatedResponse, StaffFilterParams, UpdateStaffDto};
use tracing::instrument;

use super::service::StaffService;
use crate::middleware::auth::RequireDirector;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = CreateStaffDto,
    responses(
        (status = 201, description = "Staff member created, with credentials when a login was provisioned", body = StaffCreatedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Linked account not found"),
        (status = 409, description = "Linked account already belongs to another record"),
        (status = 422, description = "Validation error")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_staff(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<CreateStaffDto>,
) -> Result<(StatusCode, Json<StaffCreatedResponse>), AppError> {
    let created =
        StaffService::create_staff(state.store.as_ref(), dto, &state.provisioning_config).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/staff",
    params(StaffFilterParams),
    responses(
        (status = 200, description = "Staff ordered by name", body = Vec<Staff>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_staff_members(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Query(filters): Query<StaffFilterParams>,
) -> Result<Json<Vec<Staff>>, AppError> {
    let staff = StaffService::get_staff_members(state.store.as_ref(), filters).await?;
    Ok(Json(staff))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(("id" = StaffId, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member", body = Staff),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Staff member not found")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_staff(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<StaffId>,
) -> Result<Json<Staff>, AppError> {
    let staff = StaffService::get_staff(state.store.as_ref(), id).await?;
    Ok(Json(staff))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    params(("id" = StaffId, Path, description = "Staff ID")),
    request_body = UpdateStaffDto,
    responses(
        (status = 200, description = "Staff member updated", body = Staff),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Staff member not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_staff(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<StaffId>,
    ValidatedJson(dto): ValidatedJson<UpdateStaffDto>,
) -> Result<Json<Staff>, AppError> {
    let staff = StaffService::update_staff(state.store.as_ref(), id, dto).await?;
    Ok(Json(staff))
}
