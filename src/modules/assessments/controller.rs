use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::assessments::{
    AssessmentFilterParams, CreateAssessmentDto, GradeSheet, RecordGradesDto, UpdateAssessmentDto,
};
use sisprof_models::ids::AssessmentId;
use sisprof_models::{Assessment, Grade};
use tracing::instrument;

use super::service::AssessmentService;
use crate::middleware::auth::RequireDirectorOrTeacher;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/assessments",
    request_body = CreateAssessmentDto,
    responses(
        (status = 201, description = "Assessment created", body = Assessment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - teacher naming another teacher"),
        (status = 422, description = "Validation error or unknown class/discipline/type/teacher")
    ),
    tag = "Assessments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_assessment(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    ValidatedJson(dto): ValidatedJson<CreateAssessmentDto>,
) -> Result<(StatusCode, Json<Assessment>), AppError> {
    let assessment =
        AssessmentService::create_assessment(state.store.as_ref(), &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

#[utoipa::path(
    get,
    path = "/api/assessments",
    params(AssessmentFilterParams),
    responses(
        (status = 200, description = "Assessments by date; teachers only see their own", body = Vec<Assessment>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director or teacher role")
    ),
    tag = "Assessments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_assessments(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Query(filters): Query<AssessmentFilterParams>,
) -> Result<Json<Vec<Assessment>>, AppError> {
    let assessments =
        AssessmentService::get_assessments(state.store.as_ref(), &auth_user, filters).await?;
    Ok(Json(assessments))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}",
    params(("id" = AssessmentId, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Assessment", body = Assessment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the director or the owning teacher"),
        (status = 404, description = "Assessment not found")
    ),
    tag = "Assessments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_assessment(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<AssessmentId>,
) -> Result<Json<Assessment>, AppError> {
    let assessment =
        AssessmentService::get_assessment_for(state.store.as_ref(), &auth_user, id).await?;
    Ok(Json(assessment))
}

#[utoipa::path(
    put,
    path = "/api/assessments/{id}",
    params(("id" = AssessmentId, Path, description = "Assessment ID")),
    request_body = UpdateAssessmentDto,
    responses(
        (status = 200, description = "Assessment updated", body = Assessment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the director or the owning teacher"),
        (status = 404, description = "Assessment not found"),
        (status = 422, description = "Validation error or a recorded grade above the new maximum")
    ),
    tag = "Assessments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_assessment(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<AssessmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateAssessmentDto>,
) -> Result<Json<Assessment>, AppError> {
    let assessment = AssessmentService::update_assessment(
        state.store.as_ref(),
        &auth_user,
        id,
        dto,
        &state.academic_config,
    )
    .await?;
    Ok(Json(assessment))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}/grades",
    params(("id" = AssessmentId, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Every enrolled student with their recorded grade", body = GradeSheet),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the director or the owning teacher"),
        (status = 404, description = "Assessment not found")
    ),
    tag = "Assessments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grades(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<AssessmentId>,
) -> Result<Json<GradeSheet>, AppError> {
    let sheet = AssessmentService::get_grade_sheet(state.store.as_ref(), &auth_user, id).await?;
    Ok(Json(sheet))
}

/// Record grades; only the assessment's teacher may do this
#[utoipa::path(
    put,
    path = "/api/assessments/{id}/grades",
    params(("id" = AssessmentId, Path, description = "Assessment ID")),
    request_body = RecordGradesDto,
    responses(
        (status = 200, description = "Stored grades", body = Vec<Grade>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - only the owning teacher may record"),
        (status = 404, description = "Assessment not found"),
        (status = 422, description = "Grade out of range, student outside the roster, or a repeated student")
    ),
    tag = "Assessments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn record_grades(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    Path(id): Path<AssessmentId>,
    ValidatedJson(dto): ValidatedJson<RecordGradesDto>,
) -> Result<Json<Vec<Grade>>, AppError> {
    let grades = AssessmentService::record_grades(
        state.store.as_ref(),
        &auth_user,
        id,
        dto,
        &state.academic_config,
    )
    .await?;
    Ok(Json(grades))
}
