//! Announcements and audience targeting.
//!
//! An announcement addresses any mix of classes, students and teachers.
//! Visibility is the union of:
//!
//! - directors see everything
//! - the sender sees their own announcements
//! - a teacher sees it when listed directly or when they teach an addressed class
//! - a student sees it when listed directly or when enrolled in an addressed class

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sisprof_core::serde::empty_string_as_none;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{AccountId, AnnouncementId, ClassId, StudentId, TeacherId};

text_enum! {
    pub enum AnnouncementKind {
        General => "general",
        /// A grade was published.
        Grade => "grade",
        Absence => "absence",
        ExcusedAbsence => "excused_absence",
        Event => "event",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub kind: AnnouncementKind,
    pub created_at: DateTime<Utc>,
    pub send_at: DateTime<Utc>,
    pub sender_id: AccountId,
    pub class_ids: Vec<ClassId>,
    pub student_ids: Vec<StudentId>,
    pub teacher_ids: Vec<TeacherId>,
    pub sent: bool,
}

/// A person-role membership used for targeting: the record id and the
/// classes it is tied to.
#[derive(Debug, Clone)]
pub struct Membership<Id> {
    pub id: Id,
    pub class_ids: Vec<ClassId>,
}

/// Who is asking to read announcements.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub account_id: AccountId,
    pub is_director: bool,
    pub teacher: Option<Membership<TeacherId>>,
    pub student: Option<Membership<StudentId>>,
}

impl Announcement {
    fn addresses_any_class(&self, class_ids: &[ClassId]) -> bool {
        class_ids.iter().any(|id| self.class_ids.contains(id))
    }

    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        if viewer.is_director || self.sender_id == viewer.account_id {
            return true;
        }

        let as_teacher = viewer.teacher.as_ref().is_some_and(|teacher| {
            self.teacher_ids.contains(&teacher.id) || self.addresses_any_class(&teacher.class_ids)
        });

        let as_student = viewer.student.as_ref().is_some_and(|student| {
            self.student_ids.contains(&student.id) || self.addresses_any_class(&student.class_ids)
        });

        as_teacher || as_student
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    pub kind: AnnouncementKind,
    /// Defaults to the creation time.
    pub send_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub class_ids: Vec<ClassId>,
    #[serde(default)]
    pub student_ids: Vec<StudentId>,
    #[serde(default)]
    pub teacher_ids: Vec<TeacherId>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnnouncementFilterParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub kind: Option<AnnouncementKind>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sent: Option<bool>,
}

impl AnnouncementFilterParams {
    pub fn matches(&self, announcement: &Announcement) -> bool {
        self.kind.is_none_or(|kind| announcement.kind == kind)
            && self.sent.is_none_or(|sent| announcement.sent == sent)
    }
}
