use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::Teacher;
use sisprof_models::ids::TeacherId;
use sisprof_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, TeacherCreatedResponse, TeacherFilterParams,
    UpdateTeacherDto,
};
use tracing::instrument;

use super::service::TeacherService;
use crate::middleware::auth::RequireDirector;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a teacher; the generated password is only ever returned here
#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created, with credentials when a login was provisioned", body = TeacherCreatedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Linked account not found"),
        (status = 409, description = "Linked account already belongs to another record"),
        (status = 422, description = "Validation error or unknown class/discipline")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<TeacherCreatedResponse>), AppError> {
    let created =
        TeacherService::create_teacher(state.store.as_ref(), dto, &state.provisioning_config)
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(TeacherFilterParams),
    responses(
        (status = 200, description = "Teachers ordered by name", body = PaginatedTeachersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Query(filters): Query<TeacherFilterParams>,
) -> Result<Json<PaginatedTeachersResponse>, AppError> {
    let teachers = TeacherService::get_teachers(state.store.as_ref(), filters).await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = TeacherId, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher", body = Teacher),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Teacher not found")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<TeacherId>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::get_teacher(state.store.as_ref(), id).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = TeacherId, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Teacher not found"),
        (status = 422, description = "Validation error or unknown class/discipline")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_teacher(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<TeacherId>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::update_teacher(state.store.as_ref(), id, dto).await?;
    Ok(Json(teacher))
}
