use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::Discipline;
use sisprof_models::disciplines::{CreateDisciplineDto, UpdateDisciplineDto};
use sisprof_models::ids::DisciplineId;
use tracing::instrument;

use super::service::DisciplineService;
use crate::middleware::auth::{AuthUser, RequireDirector};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/disciplines",
    request_body = CreateDisciplineDto,
    responses(
        (status = 201, description = "Discipline created", body = Discipline),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 422, description = "Validation error")
    ),
    tag = "Disciplines",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_discipline(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    ValidatedJson(dto): ValidatedJson<CreateDisciplineDto>,
) -> Result<(StatusCode, Json<Discipline>), AppError> {
    let discipline = DisciplineService::create_discipline(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(discipline)))
}

#[utoipa::path(
    get,
    path = "/api/disciplines",
    responses(
        (status = 200, description = "All disciplines ordered by name", body = Vec<Discipline>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Disciplines",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_disciplines(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Discipline>>, AppError> {
    let disciplines = DisciplineService::get_disciplines(state.store.as_ref()).await?;
    Ok(Json(disciplines))
}

#[utoipa::path(
    get,
    path = "/api/disciplines/{id}",
    params(("id" = DisciplineId, Path, description = "Discipline ID")),
    responses(
        (status = 200, description = "Discipline", body = Discipline),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Discipline not found")
    ),
    tag = "Disciplines",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_discipline(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DisciplineId>,
) -> Result<Json<Discipline>, AppError> {
    let discipline = DisciplineService::get_discipline(state.store.as_ref(), id).await?;
    Ok(Json(discipline))
}

#[utoipa::path(
    put,
    path = "/api/disciplines/{id}",
    params(("id" = DisciplineId, Path, description = "Discipline ID")),
    request_body = UpdateDisciplineDto,
    responses(
        (status = 200, description = "Discipline updated", body = Discipline),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Discipline not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Disciplines",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_discipline(
    State(state): State<AppState>,
    RequireDirector(_auth_user): RequireDirector,
    Path(id): Path<DisciplineId>,
    ValidatedJson(dto): ValidatedJson<UpdateDisciplineDto>,
) -> Result<Json<Discipline>, AppError> {
    let discipline = DisciplineService::update_discipline(state.store.as_ref(), id, dto).await?;
    Ok(Json(discipline))
}
