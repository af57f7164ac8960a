use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::classes::{
    ClassFilterParams, CreateClassDto, PaginatedClassesResponse, UpdateClassDto,
};
use sisprof_models::ids::ClassId;
use sisprof_models::{Class, Student};
use tracing::instrument;

use super::service::ClassService;
use crate::middleware::auth::{AuthUser, RequireDirector, RequireDirectorOrTeacher};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 422, description = "Validation error or unknown discipline")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_class(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let class = ClassService::create_class(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilterParams),
    responses(
        (status = 200, description = "Classes, newest school year first", body = PaginatedClassesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_classes(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<ClassFilterParams>,
) -> Result<Json<PaginatedClassesResponse>, AppError> {
    let classes = ClassService::get_classes(state.store.as_ref(), filters).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class", body = Class),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<ClassId>,
) -> Result<Json<Class>, AppError> {
    let class = ClassService::get_class(state.store.as_ref(), id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Validation error or unknown discipline")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_class(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<Class>, AppError> {
    let class = ClassService::update_class(state.store.as_ref(), id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/students",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Enrolled students ordered by name", body = Vec<Student>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director or teacher role"),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class_students(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(_auth_user): RequireDirectorOrTeacher,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = ClassService::get_roster(state.store.as_ref(), id).await?;
    Ok(Json(students))
}
