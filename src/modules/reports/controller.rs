use axum::{
    Json,
    extract::{Path, State},
};
use sisprof_core::AppError;
use sisprof_models::ids::{ClassId, StudentId};
use sisprof_models::{ClassReport, StudentReport};
use tracing::instrument;

use super::service::ReportService;
use crate::middleware::auth::{AuthUser, RequireDirectorOrTeacher};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/reports/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Grade averages and attendance for the student", body = StudentReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - students may only view their own report"),
        (status = 404, description = "Student not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<StudentId>,
) -> Result<Json<StudentReport>, AppError> {
    let report = ReportService::student_report(state.store.as_ref(), &auth_user, id).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/reports/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Enrollment, activity and averages for the class", body = ClassReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director or teacher role"),
        (status = 404, description = "Class not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class_report(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(_auth_user): RequireDirectorOrTeacher,
    Path(id): Path<ClassId>,
) -> Result<Json<ClassReport>, AppError> {
    let report = ReportService::class_report(state.store.as_ref(), id).await?;
    Ok(Json(report))
}
