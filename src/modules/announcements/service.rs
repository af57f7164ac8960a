//! Announcements and audience targeting.
//!
//! An announcement is addressed to any mix of classes, students and
//! teachers. Directors and the sender always see it; teachers see it when
//! named or when they teach an addressed class; students when named or
//! enrolled in an addressed class.

use std::collections::HashSet;

use anyhow::anyhow;
use chrono::Utc;
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::announcements::{AnnouncementFilterParams, CreateAnnouncementDto};
use sisprof_models::ids::{AnnouncementId, StudentId, TeacherId};
use sisprof_models::Announcement;
use sisprof_observability::{track_access_denied, track_announcement_created};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::classes::service::ClassService;
use crate::utils::auth_helpers::viewer_for;

pub struct AnnouncementService;

impl AnnouncementService {
    #[instrument(skip(store))]
    pub async fn create_announcement(
        store: &dyn Store,
        auth_user: &AuthUser,
        dto: CreateAnnouncementDto,
    ) -> Result<Announcement, AppError> {
        ClassService::ensure_exist(store, &dto.class_ids, "class_ids").await?;

        let known_students: HashSet<StudentId> =
            store.list_students().await?.into_iter().map(|s| s.id).collect();
        if let Some(id) = dto.student_ids.iter().find(|id| !known_students.contains(id)) {
            return Err(AppError::invalid_field(
                "student_ids",
                format!("student {} does not exist", id),
            ));
        }

        let known_teachers: HashSet<TeacherId> =
            store.list_teachers().await?.into_iter().map(|t| t.id).collect();
        if let Some(id) = dto.teacher_ids.iter().find(|id| !known_teachers.contains(id)) {
            return Err(AppError::invalid_field(
                "teacher_ids",
                format!("teacher {} does not exist", id),
            ));
        }

        let now = Utc::now();
        let announcement = Announcement {
            id: AnnouncementId::new(),
            title: dto.title,
            message: dto.message,
            kind: dto.kind,
            created_at: now,
            send_at: dto.send_at.unwrap_or(now),
            sender_id: auth_user.account_id()?,
            class_ids: dto.class_ids,
            student_ids: dto.student_ids,
            teacher_ids: dto.teacher_ids,
            sent: false,
        };
        store.insert_announcement(&announcement).await?;

        track_announcement_created(announcement.kind.as_str());
        tracing::info!(announcement_id = %announcement.id, kind = %announcement.kind, "announcement created");

        Ok(announcement)
    }

    /// Announcements visible to the caller, newest first.
    #[instrument(skip(store))]
    pub async fn get_announcements(
        store: &dyn Store,
        auth_user: &AuthUser,
        filters: AnnouncementFilterParams,
    ) -> Result<Vec<Announcement>, AppError> {
        let viewer = viewer_for(store, auth_user).await?;

        Ok(store
            .list_announcements()
            .await?
            .into_iter()
            .filter(|announcement| announcement.is_visible_to(&viewer) && filters.matches(announcement))
            .collect())
    }

    /// Invisible announcements are reported as missing.
    #[instrument(skip(store))]
    pub async fn get_announcement(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: AnnouncementId,
    ) -> Result<Announcement, AppError> {
        let viewer = viewer_for(store, auth_user).await?;

        store
            .get_announcement(id)
            .await?
            .filter(|announcement| announcement.is_visible_to(&viewer))
            .ok_or_else(|| AppError::not_found(anyhow!("Announcement not found")))
    }

    #[instrument(skip(store))]
    pub async fn mark_sent(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: AnnouncementId,
    ) -> Result<Announcement, AppError> {
        let mut announcement = Self::get_announcement(store, auth_user, id).await?;

        if !auth_user.is_director() && announcement.sender_id != auth_user.account_id()? {
            track_access_denied("mark_announcement_sent");
            return Err(AppError::forbidden(
                "Access denied. Only a director or the sender may mark it sent",
            ));
        }

        store.mark_announcement_sent(announcement.id).await?;
        announcement.sent = true;
        Ok(announcement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sisprof_models::AnnouncementKind;

    use crate::middleware::auth::AuthUser;
    use crate::utils::fixtures::{School, school};

    async fn visible(store: &sisprof_db::MemoryStore, login: &AuthUser) -> usize {
        AnnouncementService::get_announcements(store, login, AnnouncementFilterParams::default())
            .await
            .unwrap()
            .len()
    }

    fn to_classes(school: &School) -> CreateAnnouncementDto {
        CreateAnnouncementDto {
            title: "Reunião de pais".to_string(),
            message: "Sexta às 19h".to_string(),
            kind: AnnouncementKind::Event,
            send_at: None,
            class_ids: vec![school.class_1a],
            student_ids: vec![],
            teacher_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_class_announcement_reaches_members_only() {
        let school = school().await;
        let announcement =
            AnnouncementService::create_announcement(&school.store, &school.director_login, to_classes(&school))
                .await
                .unwrap();

        assert_eq!(visible(&school.store, &school.ana_login).await, 1);
        assert_eq!(visible(&school.store, &school.maria_login).await, 1);
        assert_eq!(visible(&school.store, &school.bruno_login).await, 0);
        assert_eq!(visible(&school.store, &school.pedro_login).await, 0);

        let err = AnnouncementService::get_announcement(&school.store, &school.bruno_login, announcement.id)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_sender_sees_own_and_may_mark_sent() {
        let school = school().await;
        let dto = CreateAnnouncementDto {
            class_ids: vec![],
            student_ids: vec![school.bruno],
            ..to_classes(&school)
        };
        let announcement = AnnouncementService::create_announcement(&school.store, &school.maria_login, dto)
            .await
            .unwrap();
        assert!(!announcement.sent);

        let sent = AnnouncementService::mark_sent(&school.store, &school.maria_login, announcement.id)
            .await
            .unwrap();
        assert!(sent.sent);

        let err = AnnouncementService::mark_sent(&school.store, &school.bruno_login, announcement.id)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[tokio::test]
    async fn test_unknown_audience_is_rejected() {
        let school = school().await;
        let dto = CreateAnnouncementDto {
            teacher_ids: vec![TeacherId::new()],
            ..to_classes(&school)
        };
        let err = AnnouncementService::create_announcement(&school.store, &school.director_login, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
        assert!(err.fields.unwrap().contains_key("teacher_ids"));
    }
}
