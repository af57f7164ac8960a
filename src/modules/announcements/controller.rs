use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::Announcement;
use sisprof_models::announcements::{AnnouncementFilterParams, CreateAnnouncementDto};
use sisprof_models::ids::AnnouncementId;
use tracing::instrument;

use super::service::AnnouncementService;
use crate::middleware::auth::{AuthUser, RequireDirectorOrTeacher};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/announcements",
    request_body = CreateAnnouncementDto,
    responses(
        (status = 201, description = "Announcement created", body = Announcement),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director or teacher role"),
        (status = 422, description = "Validation error or unknown audience member")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_announcement(
    State(state): State<AppState>,
    RequireDirectorOrTeacher(auth_user): RequireDirectorOrTeacher,
    ValidatedJson(dto): ValidatedJson<CreateAnnouncementDto>,
) -> Result<(StatusCode, Json<Announcement>), AppError> {
    let announcement =
        AnnouncementService::create_announcement(state.store.as_ref(), &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

#[utoipa::path(
    get,
    path = "/api/announcements",
    params(AnnouncementFilterParams),
    responses(
        (status = 200, description = "Announcements visible to the caller, newest first", body = Vec<Announcement>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_announcements(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<AnnouncementFilterParams>,
) -> Result<Json<Vec<Announcement>>, AppError> {
    let announcements =
        AnnouncementService::get_announcements(state.store.as_ref(), &auth_user, filters).await?;
    Ok(Json(announcements))
}

#[utoipa::path(
    get,
    path = "/api/announcements/{id}",
    params(("id" = AnnouncementId, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement", body = Announcement),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Announcement not found or not addressed to the caller")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_announcement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<AnnouncementId>,
) -> Result<Json<Announcement>, AppError> {
    let announcement =
        AnnouncementService::get_announcement(state.store.as_ref(), &auth_user, id).await?;
    Ok(Json(announcement))
}

#[utoipa::path(
    post,
    path = "/api/announcements/{id}/sent",
    params(("id" = AnnouncementId, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement marked as sent", body = Announcement),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - only a director or the sender"),
        (status = 404, description = "Announcement not found")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn mark_announcement_sent(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<AnnouncementId>,
) -> Result<Json<Announcement>, AppError> {
    let announcement = AnnouncementService::mark_sent(state.store.as_ref(), &auth_user, id).await?;
    Ok(Json(announcement))
}
