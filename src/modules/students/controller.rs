use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::Student;
use sisprof_models::ids::StudentId;
use sisprof_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, StudentCreatedResponse, StudentFilterParams,
    UpdateStudentDto,
};
use tracing::instrument;

use super::service::StudentService;
use crate::middleware::auth::{AuthUser, RequireDirector, RequireDirectorOrTeacher};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a student; the generated password is only ever returned here
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created, with credentials when a login was provisioned", body = StudentCreatedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Linked account not found"),
        (status = 409, description = "Linked account already belongs to another record"),
        (status = 422, description = "Validation error or unknown class")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<StudentCreatedResponse>), AppError> {
    let created =
        StudentService::create_student(state.store.as_ref(), dto, &state.provisioning_config)
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Students ordered by name", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director or teacher role")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(_auth_user): RequireDirectorOrTeacher,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let students = StudentService::get_students(state.store.as_ref(), filters).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not a director, teacher or the student"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<StudentId>,
) -> Result<Json<Student>, AppError> {
    StudentService::ensure_can_view(state.store.as_ref(), &auth_user, id).await?;
    let student = StudentService::get_student(state.store.as_ref(), id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Validation error or unknown class")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_student(state.store.as_ref(), id, dto).await?;
    Ok(Json(student))
}
