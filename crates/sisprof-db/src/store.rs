//! Record store traits.
//!
//! The API talks to persistence only through these traits. Each trait covers
//! one area of the domain; [`Store`] bundles them so application state can
//! hold a single `Arc<dyn Store>`.
//!
//! Conventions:
//!
//! - IDs are generated by the caller; `insert_*` stores the value as given.
//! - `get_*` returns `Ok(None)` for a missing record.
//! - `update_*` overwrites every column and replaces relation sets.
//! - Uniqueness violations come back as a 409 [`AppError`].
//! - Multi-row writes (`upsert_*`, person inserts with provisioning) are atomic.

use async_trait::async_trait;
use sisprof_core::AppError;
use sisprof_models::ids::{
    AccountId, AnnouncementId, AssessmentId, AssessmentTypeId, ClassId, DisciplineId, GuardianId,
    LessonId, PayableId, ReceivableId, StaffId, StudentId, TeacherId,
};
use sisprof_models::{
    AccountRequest, Announcement, Assessment, AssessmentType, Attendance, AttendanceEntry, Class,
    Discipline, Grade, GradeEntry, Guardian, Lesson, NewAccount, Payable, Receivable,
    SchoolSettings, Staff, Student, Teacher, UserAccount,
};

pub type StoreResult<T> = Result<T, AppError>;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert_account(&self, account: &NewAccount) -> StoreResult<UserAccount>;
    async fn get_account(&self, id: AccountId) -> StoreResult<Option<UserAccount>>;
    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>>;
}

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn insert_discipline(&self, discipline: &Discipline) -> StoreResult<()>;
    async fn update_discipline(&self, discipline: &Discipline) -> StoreResult<()>;
    async fn get_discipline(&self, id: DisciplineId) -> StoreResult<Option<Discipline>>;
    async fn list_disciplines(&self) -> StoreResult<Vec<Discipline>>;

    async fn insert_class(&self, class: &Class) -> StoreResult<()>;
    async fn update_class(&self, class: &Class) -> StoreResult<()>;
    async fn get_class(&self, id: ClassId) -> StoreResult<Option<Class>>;
    async fn list_classes(&self) -> StoreResult<Vec<Class>>;

    /// Inserts the teacher; with a request, provisions and links a login
    /// identity in the same transaction and returns it.
    async fn insert_teacher(
        &self,
        teacher: &Teacher,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Teacher, Option<UserAccount>)>;
    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()>;
    async fn get_teacher(&self, id: TeacherId) -> StoreResult<Option<Teacher>>;
    async fn find_teacher_by_account(&self, account_id: AccountId)
    -> StoreResult<Option<Teacher>>;
    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>>;

    async fn insert_student(
        &self,
        student: &Student,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Student, Option<UserAccount>)>;
    async fn update_student(&self, student: &Student) -> StoreResult<()>;
    async fn get_student(&self, id: StudentId) -> StoreResult<Option<Student>>;
    async fn find_student_by_account(&self, account_id: AccountId)
    -> StoreResult<Option<Student>>;
    async fn list_students(&self) -> StoreResult<Vec<Student>>;
    /// Students enrolled in the class, ordered by name.
    async fn list_students_in_class(&self, class_id: ClassId) -> StoreResult<Vec<Student>>;

    async fn insert_staff(
        &self,
        staff: &Staff,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Staff, Option<UserAccount>)>;
    async fn update_staff(&self, staff: &Staff) -> StoreResult<()>;
    async fn get_staff(&self, id: StaffId) -> StoreResult<Option<Staff>>;
    async fn list_staff(&self) -> StoreResult<Vec<Staff>>;

    /// Conflicts when the student already has a guardian.
    async fn insert_guardian(&self, guardian: &Guardian) -> StoreResult<()>;
    async fn update_guardian(&self, guardian: &Guardian) -> StoreResult<()>;
    async fn get_guardian(&self, id: GuardianId) -> StoreResult<Option<Guardian>>;
    async fn list_guardians(&self) -> StoreResult<Vec<Guardian>>;
    /// Returns whether a record was removed.
    async fn delete_guardian(&self, id: GuardianId) -> StoreResult<bool>;
}

#[async_trait]
pub trait AcademicStore: Send + Sync {
    async fn insert_assessment_type(&self, assessment_type: &AssessmentType) -> StoreResult<()>;
    async fn update_assessment_type(&self, assessment_type: &AssessmentType) -> StoreResult<()>;
    async fn get_assessment_type(&self, id: AssessmentTypeId)
    -> StoreResult<Option<AssessmentType>>;
    async fn list_assessment_types(&self) -> StoreResult<Vec<AssessmentType>>;

    /// Conflicts on a second lesson for the same class, discipline and date.
    async fn insert_lesson(&self, lesson: &Lesson) -> StoreResult<()>;
    async fn update_lesson(&self, lesson: &Lesson) -> StoreResult<()>;
    async fn get_lesson(&self, id: LessonId) -> StoreResult<Option<Lesson>>;
    async fn list_lessons(&self) -> StoreResult<Vec<Lesson>>;

    /// Inserts or replaces one attendance record per entry, keyed by
    /// (lesson, student). All entries are written or none.
    async fn upsert_attendance(
        &self,
        lesson_id: LessonId,
        entries: &[AttendanceEntry],
    ) -> StoreResult<Vec<Attendance>>;
    async fn list_attendance_for_lesson(&self, lesson_id: LessonId)
    -> StoreResult<Vec<Attendance>>;
    async fn list_attendance_for_student(
        &self,
        student_id: StudentId,
    ) -> StoreResult<Vec<Attendance>>;
    async fn list_attendance_for_class(&self, class_id: ClassId) -> StoreResult<Vec<Attendance>>;

    async fn insert_assessment(&self, assessment: &Assessment) -> StoreResult<()>;
    async fn update_assessment(&self, assessment: &Assessment) -> StoreResult<()>;
    async fn get_assessment(&self, id: AssessmentId) -> StoreResult<Option<Assessment>>;
    async fn list_assessments(&self) -> StoreResult<Vec<Assessment>>;

    /// Inserts or replaces one grade per entry, keyed by (assessment, student).
    /// All entries are written or none.
    async fn upsert_grades(
        &self,
        assessment_id: AssessmentId,
        entries: &[GradeEntry],
    ) -> StoreResult<Vec<Grade>>;
    async fn list_grades_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> StoreResult<Vec<Grade>>;
    async fn list_grades_for_student(&self, student_id: StudentId) -> StoreResult<Vec<Grade>>;
    async fn list_grades_for_class(&self, class_id: ClassId) -> StoreResult<Vec<Grade>>;
}

#[async_trait]
pub trait NoticeStore: Send + Sync {
    async fn insert_announcement(&self, announcement: &Announcement) -> StoreResult<()>;
    async fn get_announcement(&self, id: AnnouncementId) -> StoreResult<Option<Announcement>>;
    /// Newest `send_at` first.
    async fn list_announcements(&self) -> StoreResult<Vec<Announcement>>;
    async fn mark_announcement_sent(&self, id: AnnouncementId) -> StoreResult<()>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_payable(&self, payable: &Payable) -> StoreResult<()>;
    async fn update_payable(&self, payable: &Payable) -> StoreResult<()>;
    async fn get_payable(&self, id: PayableId) -> StoreResult<Option<Payable>>;
    async fn list_payables(&self) -> StoreResult<Vec<Payable>>;

    async fn insert_receivable(&self, receivable: &Receivable) -> StoreResult<()>;
    async fn update_receivable(&self, receivable: &Receivable) -> StoreResult<()>;
    async fn get_receivable(&self, id: ReceivableId) -> StoreResult<Option<Receivable>>;
    async fn list_receivables(&self) -> StoreResult<Vec<Receivable>>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// `None` until settings are saved for the first time.
    async fn load_settings(&self) -> StoreResult<Option<SchoolSettings>>;
    async fn save_settings(&self, settings: &SchoolSettings) -> StoreResult<()>;
}

/// Every store area behind one object.
pub trait Store:
    IdentityStore
    + DirectoryStore
    + AcademicStore
    + NoticeStore
    + LedgerStore
    + SettingsStore
    + Send
    + Sync
    + 'static
{
}

impl<T> Store for T where
    T: IdentityStore
        + DirectoryStore
        + AcademicStore
        + NoticeStore
        + LedgerStore
        + SettingsStore
        + Send
        + Sync
        + 'static
{
}
