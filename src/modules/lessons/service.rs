//! Lessons and their attendance.
//!
//! A lesson belongs to one teacher. Only that teacher records attendance,
//! and every submission is checked against the class roster before anything
//! is written.

use std::collections::HashMap;

use anyhow::anyhow;
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::ids::LessonId;
use sisprof_models::lessons::{
    AttendanceSheet, AttendanceSheetRow, CreateLessonDto, LessonFilterParams, RecordAttendanceDto,
    UpdateLessonDto,
};
use sisprof_models::roster::check_against_roster;
use sisprof_models::{Attendance, Lesson};
use sisprof_observability::track_attendance_recorded;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::classes::service::ClassService;
use crate::utils::auth_helpers::{
    ensure_director_or_owner, ensure_owner, require_teacher_record, resolve_owning_teacher,
};

pub struct LessonService;

impl LessonService {
    #[instrument(skip(store))]
    pub async fn create_lesson(
        store: &dyn Store,
        auth_user: &AuthUser,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let teacher_id = resolve_owning_teacher(store, auth_user, dto.teacher_id).await?;
        ClassService::ensure_exist(store, &[dto.class_id], "class_id").await?;
        if store.get_discipline(dto.discipline_id).await?.is_none() {
            return Err(AppError::invalid_field(
                "discipline_id",
                format!("discipline {} does not exist", dto.discipline_id),
            ));
        }

        let lesson = Lesson {
            id: LessonId::new(),
            class_id: dto.class_id,
            discipline_id: dto.discipline_id,
            teacher_id,
            date: dto.date,
            content: dto.content,
        };
        store.insert_lesson(&lesson).await?;

        Ok(lesson)
    }

    /// Directors see every lesson; teachers see only their own.
    #[instrument(skip(store))]
    pub async fn get_lessons(
        store: &dyn Store,
        auth_user: &AuthUser,
        mut filters: LessonFilterParams,
    ) -> Result<Vec<Lesson>, AppError> {
        if !auth_user.is_director() {
            filters.teacher_id = Some(require_teacher_record(store, auth_user).await?.id);
        }

        Ok(store
            .list_lessons()
            .await?
            .into_iter()
            .filter(|lesson| filters.matches(lesson))
            .collect())
    }

    #[instrument(skip(store))]
    pub async fn get_lesson(store: &dyn Store, id: LessonId) -> Result<Lesson, AppError> {
        store
            .get_lesson(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Lesson not found")))
    }

    #[instrument(skip(store))]
    pub async fn get_lesson_for(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: LessonId,
    ) -> Result<Lesson, AppError> {
        let lesson = Self::get_lesson(store, id).await?;
        ensure_director_or_owner(store, auth_user, lesson.teacher_id).await?;
        Ok(lesson)
    }

    #[instrument(skip(store))]
    pub async fn update_lesson(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: LessonId,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        let mut lesson = Self::get_lesson_for(store, auth_user, id).await?;

        if let Some(date) = dto.date {
            lesson.date = date;
        }
        if dto.content.is_some() {
            lesson.content = dto.content;
        }

        store.update_lesson(&lesson).await?;
        Ok(lesson)
    }

    /// Every enrolled student with whatever status is recorded so far.
    #[instrument(skip(store))]
    pub async fn get_attendance_sheet(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: LessonId,
    ) -> Result<AttendanceSheet, AppError> {
        let lesson = Self::get_lesson_for(store, auth_user, id).await?;
        let roster = store.list_students_in_class(lesson.class_id).await?;
        let mut recorded: HashMap<_, Attendance> = store
            .list_attendance_for_lesson(lesson.id)
            .await?
            .into_iter()
            .map(|attendance| (attendance.student_id, attendance))
            .collect();

        let rows = roster
            .into_iter()
            .map(|student| {
                let attendance = recorded.remove(&student.id);
                AttendanceSheetRow {
                    student_id: student.id,
                    student_name: student.name,
                    status: attendance.as_ref().map(|a| a.status),
                    note: attendance.and_then(|a| a.note),
                }
            })
            .collect();

        Ok(AttendanceSheet { lesson, rows })
    }

    /// Upserts one record per entry. Non-owners and off-roster entries are
    /// refused before anything is written.
    #[instrument(skip(store, dto), fields(entries = dto.entries.len()))]
    pub async fn record_attendance(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: LessonId,
        dto: RecordAttendanceDto,
    ) -> Result<Vec<Attendance>, AppError> {
        let lesson = Self::get_lesson(store, id).await?;
        ensure_owner(store, auth_user, lesson.teacher_id).await?;

        let roster: Vec<_> = store
            .list_students_in_class(lesson.class_id)
            .await?
            .into_iter()
            .map(|student| student.id)
            .collect();
        check_against_roster(dto.entries.iter().map(|e| e.student_id), &roster)
            .map_err(|violation| AppError::invalid_field("entries", violation.to_string()))?;

        let recorded = store.upsert_attendance(lesson.id, &dto.entries).await?;
        track_attendance_recorded(recorded.len());
        tracing::info!(lesson_id = %lesson.id, count = recorded.len(), "attendance recorded");

        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sisprof_db::AcademicStore;
    use sisprof_models::AttendanceStatus;
    use sisprof_models::ids::StudentId;
    use sisprof_models::lessons::AttendanceEntry;

    use crate::utils::fixtures::{School, school};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    async fn maria_lesson(school: &School) -> Lesson {
        LessonService::create_lesson(
            &school.store,
            &school.maria_login,
            CreateLessonDto {
                class_id: school.class_1a,
                discipline_id: school.math,
                teacher_id: None,
                date: date(),
                content: Some("Frações".to_string()),
            },
        )
        .await
        .unwrap()
    }

    fn entry(student_id: StudentId, status: AttendanceStatus, note: Option<&str>) -> AttendanceEntry {
        AttendanceEntry {
            student_id,
            status,
            note: note.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_teacher_owns_created_lesson() {
        let school = school().await;
        let lesson = maria_lesson(&school).await;
        assert_eq!(lesson.teacher_id, school.maria);
    }

    #[tokio::test]
    async fn test_duplicate_lesson_is_conflict() {
        let school = school().await;
        maria_lesson(&school).await;

        let err = LessonService::create_lesson(
            &school.store,
            &school.director_login,
            CreateLessonDto {
                class_id: school.class_1a,
                discipline_id: school.math,
                teacher_id: Some(school.pedro),
                date: date(),
                content: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 409);
    }

    #[tokio::test]
    async fn test_recording_twice_keeps_latest() {
        let school = school().await;
        let lesson = maria_lesson(&school).await;

        for (status, note) in [
            (AttendanceStatus::Absent, None),
            (AttendanceStatus::Excused, Some("atestado")),
        ] {
            LessonService::record_attendance(
                &school.store,
                &school.maria_login,
                lesson.id,
                RecordAttendanceDto {
                    entries: vec![entry(school.ana, status, note)],
                },
            )
            .await
            .unwrap();
        }

        let records = school.store.list_attendance_for_lesson(lesson.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Excused);
        assert_eq!(records[0].note.as_deref(), Some("atestado"));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_record() {
        let school = school().await;
        let lesson = maria_lesson(&school).await;
        let dto = || RecordAttendanceDto {
            entries: vec![entry(school.ana, AttendanceStatus::Present, None)],
        };

        for login in [&school.pedro_login, &school.director_login, &school.ana_login] {
            let err = LessonService::record_attendance(&school.store, login, lesson.id, dto())
                .await
                .unwrap_err();
            assert_eq!(err.status.as_u16(), 403);
        }
        assert!(school.store.list_attendance_for_lesson(lesson.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_off_roster_entry_rejects_whole_submission() {
        let school = school().await;
        let lesson = maria_lesson(&school).await;

        let err = LessonService::record_attendance(
            &school.store,
            &school.maria_login,
            lesson.id,
            RecordAttendanceDto {
                entries: vec![
                    entry(school.ana, AttendanceStatus::Present, None),
                    entry(school.bruno, AttendanceStatus::Present, None),
                ],
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status.as_u16(), 422);
        assert!(err.fields.unwrap().contains_key("entries"));
        assert!(school.store.list_attendance_for_lesson(lesson.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sheet_lists_whole_roster() {
        let school = school().await;
        let lesson = maria_lesson(&school).await;

        let sheet = LessonService::get_attendance_sheet(&school.store, &school.maria_login, lesson.id)
            .await
            .unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].student_name, "Ana");
        assert!(sheet.rows[0].status.is_none());
    }

    #[tokio::test]
    async fn test_teachers_list_only_their_lessons() {
        let school = school().await;
        maria_lesson(&school).await;

        let for_pedro = LessonService::get_lessons(
            &school.store,
            &school.pedro_login,
            LessonFilterParams::default(),
        )
        .await
        .unwrap();
        assert!(for_pedro.is_empty());

        let for_director = LessonService::get_lessons(
            &school.store,
            &school.director_login,
            LessonFilterParams::default(),
        )
        .await
        .unwrap();
        assert_eq!(for_director.len(), 1);
    }
}
