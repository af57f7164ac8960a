//! Lessons and attendance.
//!
//! A lesson is unique per (class, discipline, date). Attendance is unique per
//! (lesson, student); recording it again replaces status and note.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sisprof_core::serde::empty_string_as_none;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{AttendanceId, ClassId, DisciplineId, LessonId, StudentId, TeacherId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: LessonId,
    pub class_id: ClassId,
    pub discipline_id: DisciplineId,
    pub teacher_id: TeacherId,
    pub date: NaiveDate,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    pub class_id: ClassId,
    pub discipline_id: DisciplineId,
    /// Required for directors; teachers always create lessons for themselves.
    pub teacher_id: Option<TeacherId>,
    pub date: NaiveDate,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLessonDto {
    pub date: Option<NaiveDate>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LessonFilterParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<ClassId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub discipline_id: Option<DisciplineId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub teacher_id: Option<TeacherId>,
    /// Inclusive lower bound on the lesson date
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the lesson date
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub to: Option<NaiveDate>,
}

impl LessonFilterParams {
    pub fn matches(&self, lesson: &Lesson) -> bool {
        self.class_id.is_none_or(|id| lesson.class_id == id)
            && self.discipline_id.is_none_or(|id| lesson.discipline_id == id)
            && self.teacher_id.is_none_or(|id| lesson.teacher_id == id)
            && self.from.is_none_or(|from| lesson.date >= from)
            && self.to.is_none_or(|to| lesson.date <= to)
    }
}

text_enum! {
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        /// Absent with a justification.
        Excused => "excused",
    }
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Present
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: AttendanceId,
    pub lesson_id: LessonId,
    pub student_id: StudentId,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// One student's line in an attendance submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttendanceEntry {
    pub student_id: StudentId,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordAttendanceDto {
    #[validate(length(min = 1), nested)]
    pub entries: Vec<AttendanceEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceSheetRow {
    pub student_id: StudentId,
    pub student_name: String,
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
}

/// Every roster student of a lesson with their recorded status, if any.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceSheet {
    pub lesson: Lesson,
    pub rows: Vec<AttendanceSheetRow>,
}
