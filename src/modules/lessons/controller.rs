use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::ids::LessonId;
use sisprof_models::lessons::{
    AttendanceSheet, CreateLessonDto, LessonFilterParams, RecordAttendanceDto, UpdateLessonDto,
};
use sisprof_models::{Attendance, Lesson};
use tracing::instrument;

use super::service::LessonService;
use crate::middleware::auth::RequireDirectorOrTeacher;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a lesson; directors name the teacher, teachers create their own
#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - teacher naming another teacher"),
        (status = 409, description = "Class already has a lesson of this discipline on this date"),
        (status = 422, description = "Validation error or unknown class/discipline/teacher")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = LessonService::create_lesson(state.store.as_ref(), &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    get,
    path = "/api/lessons",
    params(LessonFilterParams),
    responses(
        (status = 200, description = "Lessons ordered by date; teachers only see their own", body = Vec<Lesson>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director or teacher role")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lessons(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Query(filters): Query<LessonFilterParams>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let lessons = LessonService::get_lessons(state.store.as_ref(), &auth_user, filters).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(("id" = LessonId, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson", body = Lesson),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the director or the owning teacher"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lesson(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<LessonId>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::get_lesson_for(state.store.as_ref(), &auth_user, id).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    params(("id" = LessonId, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the director or the owning teacher"),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Class already has a lesson of this discipline on this date")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_lesson(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<LessonId>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::update_lesson(state.store.as_ref(), &auth_user, id, dto).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}/attendance",
    params(("id" = LessonId, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Every enrolled student with their recorded status", body = AttendanceSheet),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the director or the owning teacher"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_attendance(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<LessonId>,
) -> Result<Json<AttendanceSheet>, AppError> {
    let sheet = LessonService::get_attendance_sheet(state.store.as_ref(), &auth_user, id).await?;
    Ok(Json(sheet))
}

/// Record attendance; only the lesson's teacher may do this
#[utoipa::path(
    put,
    path = "/api/lessons/{id}/attendance",
    params(("id" = LessonId, Path, description = "Lesson ID")),
    request_body = RecordAttendanceDto,
    responses(
        (status = 200, description = "Stored attendance records", body = Vec<Attendance>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - only the owning teacher may record"),
        (status = 404, description = "Lesson not found"),
        (status = 422, description = "Entry for a student outside the roster, or a repeated student")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn record_attendance(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<LessonId>,
    ValidatedJson(dto): ValidatedJson<RecordAttendanceDto>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let records =
        LessonService::record_attendance(state.store.as_ref(), &auth_user, id, dto).await?;
    Ok(Json(records))
}
