use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::AssessmentType;
use sisprof_models::assessments::{CreateAssessmentTypeDto, UpdateAssessmentTypeDto};
use sisprof_models::ids::AssessmentTypeId;
use tracing::instrument;

use super::service::AssessmentTypeService;
use crate::middleware::auth::{AuthUser, RequireDirector};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/assessment-types",
    request_body = CreateAssessmentTypeDto,
    responses(
        (status = 201, description = "Assessment type created", body = AssessmentType),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 422, description = "Validation error")
    ),
    tag = "Assessment Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_assessment_type(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<CreateAssessmentTypeDto>,
) -> Result<(StatusCode, Json<AssessmentType>), AppError> {
    let assessment_type =
        AssessmentTypeService::create_assessment_type(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(assessment_type)))
}

#[utoipa::path(
    get,
    path = "/api/assessment-types",
    responses(
        (status = 200, description = "All assessment types", body = Vec<AssessmentType>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Assessment Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_assessment_types(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<AssessmentType>>, AppError> {
    let types = AssessmentTypeService::get_assessment_types(state.store.as_ref()).await?;
    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/api/assessment-types/{id}",
    params(("id" = AssessmentTypeId, Path, description = "Assessment type ID")),
    responses(
        (status = 200, description = "Assessment type", body = AssessmentType),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Assessment type not found")
    ),
    tag = "Assessment Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_assessment_type(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<AssessmentTypeId>,
) -> Result<Json<AssessmentType>, AppError> {
    let assessment_type =
        AssessmentTypeService::get_assessment_type(state.store.as_ref(), id).await?;
    Ok(Json(assessment_type))
}

#[utoipa::path(
    put,
    path = "/api/assessment-types/{id}",
    params(("id" = AssessmentTypeId, Path, description = "Assessment type ID")),
    request_body = UpdateAssessmentTypeDto,
    responses(
        (status = 200, description = "Assessment type updated", body = AssessmentType),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Assessment type not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Assessment Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_assessment_type(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<AssessmentTypeId>,
    ValidatedJson(dto): ValidatedJson<UpdateAssessmentTypeDto>,
) -> Result<Json<AssessmentType>, AppError> {
    let assessment_type =
        AssessmentTypeService::update_assessment_type(state.store.as_ref(), id, dto).await?;
    Ok(Json(assessment_type))
}
