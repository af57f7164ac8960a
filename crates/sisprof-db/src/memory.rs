//! In-memory record store.
//!
//! Every operation takes the single lock for its whole duration, so
//! check-then-write sequences (uniqueness checks, upserts, provisioning) are
//! atomic with respect to each other.

use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use sisprof_core::AppError;
use sisprof_models::identity::next_available_username;
use sisprof_models::ids::{
    AccountId, AnnouncementId, AssessmentId, AssessmentTypeId, AttendanceId, ClassId,
    DisciplineId, GradeId, GuardianId, LessonId, PayableId, ReceivableId, StaffId, StudentId,
    TeacherId,
};
use sisprof_models::{
    AccountRequest, Announcement, Assessment, AssessmentType, Attendance, AttendanceEntry, Class,
    Discipline, Grade, GradeEntry, Guardian, Lesson, NewAccount, Payable, Receivable,
    SchoolSettings, Staff, Student, Teacher, UserAccount,
};

use crate::store::{
    AcademicStore, DirectoryStore, IdentityStore, LedgerStore, NoticeStore, SettingsStore,
    StoreResult,
};

#[derive(Default)]
struct MemoryData {
    accounts: HashMap<AccountId, UserAccount>,
    disciplines: HashMap<DisciplineId, Discipline>,
    classes: HashMap<ClassId, Class>,
    teachers: HashMap<TeacherId, Teacher>,
    students: HashMap<StudentId, Student>,
    staff: HashMap<StaffId, Staff>,
    guardians: HashMap<GuardianId, Guardian>,
    assessment_types: HashMap<AssessmentTypeId, AssessmentType>,
    lessons: HashMap<LessonId, Lesson>,
    attendance: HashMap<(LessonId, StudentId), Attendance>,
    assessments: HashMap<AssessmentId, Assessment>,
    grades: HashMap<(AssessmentId, StudentId), Grade>,
    announcements: HashMap<AnnouncementId, Announcement>,
    payables: HashMap<PayableId, Payable>,
    receivables: HashMap<ReceivableId, Receivable>,
    settings: Option<SchoolSettings>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

fn conflict(message: impl Into<String>) -> AppError {
    AppError::conflict(anyhow!(message.into()))
}

fn missing(what: &str) -> AppError {
    AppError::not_found(anyhow!("{} not found", what))
}

/// Values sorted by `key`, ties broken by id for a stable order.
fn sorted_by<K, V, S, F>(map: &HashMap<K, V>, key: F) -> Vec<V>
where
    V: Clone,
    S: Ord,
    F: Fn(&V) -> S,
{
    let mut values: Vec<V> = map.values().cloned().collect();
    values.sort_by_key(|value| key(value));
    values
}

impl MemoryData {
    fn username_taken(&self, username: &str) -> bool {
        self.accounts.values().any(|a| a.username == username)
    }

    fn account_linked(&self, account_id: AccountId) -> bool {
        self.teachers
            .values()
            .any(|t| t.account_id == Some(account_id))
            || self
                .students
                .values()
                .any(|s| s.account_id == Some(account_id))
            || self.staff.values().any(|s| s.account_id == Some(account_id))
    }

    fn insert_account(&mut self, account: &NewAccount) -> StoreResult<UserAccount> {
        if self.username_taken(&account.username) {
            return Err(conflict(format!(
                "username '{}' is already taken",
                account.username
            )));
        }

        let stored = UserAccount {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            roles: account.roles.clone(),
            created_at: Utc::now(),
        };
        self.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    /// Checks and provisioning for a new person record. Nothing is written
    /// unless every check passes.
    fn link_account(
        &mut self,
        existing: Option<AccountId>,
        request: Option<&AccountRequest>,
    ) -> StoreResult<(Option<AccountId>, Option<UserAccount>)> {
        if let Some(account_id) = existing {
            if !self.accounts.contains_key(&account_id) {
                return Err(missing("Account"));
            }
            if self.account_linked(account_id) {
                return Err(conflict("account is already linked to another record"));
            }
        }

        match request {
            None => Ok((existing, None)),
            Some(request) => {
                let taken: Vec<&str> = self
                    .accounts
                    .values()
                    .map(|a| a.username.as_str())
                    .filter(|name| name.starts_with(&request.base_username))
                    .collect();
                let username = next_available_username(&request.base_username, &taken);

                let account = self.insert_account(&NewAccount {
                    id: AccountId::new(),
                    username,
                    email: request.email.clone(),
                    password_hash: request.password_hash.clone(),
                    roles: vec![request.role],
                })?;
                Ok((Some(account.id), Some(account)))
            }
        }
    }

    fn lesson_slot_taken(&self, lesson: &Lesson) -> bool {
        self.lessons.values().any(|other| {
            other.id != lesson.id
                && other.class_id == lesson.class_id
                && other.discipline_id == lesson.discipline_id
                && other.date == lesson.date
        })
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn insert_account(&self, account: &NewAccount) -> StoreResult<UserAccount> {
        self.data.write().await.insert_account(account)
    }

    async fn get_account(&self, id: AccountId) -> StoreResult<Option<UserAccount>> {
        Ok(self.data.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        Ok(self
            .data
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn insert_discipline(&self, discipline: &Discipline) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.disciplines.insert(discipline.id, discipline.clone());
        Ok(())
    }

    async fn update_discipline(&self, discipline: &Discipline) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .disciplines
            .get_mut(&discipline.id)
            .ok_or_else(|| missing("Discipline"))?;
        *slot = discipline.clone();
        Ok(())
    }

    async fn get_discipline(&self, id: DisciplineId) -> StoreResult<Option<Discipline>> {
        Ok(self.data.read().await.disciplines.get(&id).cloned())
    }

    async fn list_disciplines(&self) -> StoreResult<Vec<Discipline>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.disciplines, |d| (d.name.clone(), d.id)))
    }

    async fn insert_class(&self, class: &Class) -> StoreResult<()> {
        self.data
            .write()
            .await
            .classes
            .insert(class.id, class.clone());
        Ok(())
    }

    async fn update_class(&self, class: &Class) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .classes
            .get_mut(&class.id)
            .ok_or_else(|| missing("Class"))?;
        *slot = class.clone();
        Ok(())
    }

    async fn get_class(&self, id: ClassId) -> StoreResult<Option<Class>> {
        Ok(self.data.read().await.classes.get(&id).cloned())
    }

    async fn list_classes(&self) -> StoreResult<Vec<Class>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.classes, |c| {
            (std::cmp::Reverse(c.school_year), c.name.clone(), c.id)
        }))
    }

    async fn insert_teacher(
        &self,
        teacher: &Teacher,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Teacher, Option<UserAccount>)> {
        let mut data = self.data.write().await;
        let (account_id, provisioned) = data.link_account(teacher.account_id, account)?;

        let stored = Teacher {
            account_id,
            ..teacher.clone()
        };
        data.teachers.insert(stored.id, stored.clone());
        Ok((stored, provisioned))
    }

    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .teachers
            .get_mut(&teacher.id)
            .ok_or_else(|| missing("Teacher"))?;
        *slot = teacher.clone();
        Ok(())
    }

    async fn get_teacher(&self, id: TeacherId) -> StoreResult<Option<Teacher>> {
        Ok(self.data.read().await.teachers.get(&id).cloned())
    }

    async fn find_teacher_by_account(
        &self,
        account_id: AccountId,
    ) -> StoreResult<Option<Teacher>> {
        Ok(self
            .data
            .read()
            .await
            .teachers
            .values()
            .find(|t| t.account_id == Some(account_id))
            .cloned())
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.teachers, |t| (t.name.clone(), t.id)))
    }

    async fn insert_student(
        &self,
        student: &Student,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Student, Option<UserAccount>)> {
        let mut data = self.data.write().await;
        let (account_id, provisioned) = data.link_account(student.account_id, account)?;

        let stored = Student {
            account_id,
            ..student.clone()
        };
        data.students.insert(stored.id, stored.clone());
        Ok((stored, provisioned))
    }

    async fn update_student(&self, student: &Student) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .students
            .get_mut(&student.id)
            .ok_or_else(|| missing("Student"))?;
        *slot = student.clone();
        Ok(())
    }

    async fn get_student(&self, id: StudentId) -> StoreResult<Option<Student>> {
        Ok(self.data.read().await.students.get(&id).cloned())
    }

    async fn find_student_by_account(
        &self,
        account_id: AccountId,
    ) -> StoreResult<Option<Student>> {
        Ok(self
            .data
            .read()
            .await
            .students
            .values()
            .find(|s| s.account_id == Some(account_id))
            .cloned())
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.students, |s| (s.name.clone(), s.id)))
    }

    async fn list_students_in_class(&self, class_id: ClassId) -> StoreResult<Vec<Student>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.students, |s| (s.name.clone(), s.id))
            .into_iter()
            .filter(|s| s.is_enrolled_in(class_id))
            .collect())
    }

    async fn insert_staff(
        &self,
        staff: &Staff,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Staff, Option<UserAccount>)> {
        let mut data = self.data.write().await;
        let (account_id, provisioned) = data.link_account(staff.account_id, account)?;

        let stored = Staff {
            account_id,
            ..staff.clone()
        };
        data.staff.insert(stored.id, stored.clone());
        Ok((stored, provisioned))
    }

    async fn update_staff(&self, staff: &Staff) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .staff
            .get_mut(&staff.id)
            .ok_or_else(|| missing("Staff member"))?;
        *slot = staff.clone();
        Ok(())
    }

    async fn get_staff(&self, id: StaffId) -> StoreResult<Option<Staff>> {
        Ok(self.data.read().await.staff.get(&id).cloned())
    }

    async fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.staff, |s| (s.name.clone(), s.id)))
    }

    async fn insert_guardian(&self, guardian: &Guardian) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data
            .guardians
            .values()
            .any(|g| g.student_id == guardian.student_id)
        {
            return Err(conflict("student already has a guardian"));
        }
        data.guardians.insert(guardian.id, guardian.clone());
        Ok(())
    }

    async fn update_guardian(&self, guardian: &Guardian) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .guardians
            .get_mut(&guardian.id)
            .ok_or_else(|| missing("Guardian"))?;
        *slot = guardian.clone();
        Ok(())
    }

    async fn get_guardian(&self, id: GuardianId) -> StoreResult<Option<Guardian>> {
        Ok(self.data.read().await.guardians.get(&id).cloned())
    }

    async fn list_guardians(&self) -> StoreResult<Vec<Guardian>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.guardians, |g| (g.name.clone(), g.id)))
    }

    async fn delete_guardian(&self, id: GuardianId) -> StoreResult<bool> {
        Ok(self.data.write().await.guardians.remove(&id).is_some())
    }
}

#[async_trait]
impl AcademicStore for MemoryStore {
    async fn insert_assessment_type(&self, assessment_type: &AssessmentType) -> StoreResult<()> {
        self.data
            .write()
            .await
            .assessment_types
            .insert(assessment_type.id, assessment_type.clone());
        Ok(())
    }

    async fn update_assessment_type(&self, assessment_type: &AssessmentType) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .assessment_types
            .get_mut(&assessment_type.id)
            .ok_or_else(|| missing("Assessment type"))?;
        *slot = assessment_type.clone();
        Ok(())
    }

    async fn get_assessment_type(
        &self,
        id: AssessmentTypeId,
    ) -> StoreResult<Option<AssessmentType>> {
        Ok(self.data.read().await.assessment_types.get(&id).cloned())
    }

    async fn list_assessment_types(&self) -> StoreResult<Vec<AssessmentType>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.assessment_types, |t| (t.name.clone(), t.id)))
    }

    async fn insert_lesson(&self, lesson: &Lesson) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data.lesson_slot_taken(lesson) {
            return Err(conflict(
                "a lesson for this class and discipline already exists on this date",
            ));
        }
        data.lessons.insert(lesson.id, lesson.clone());
        Ok(())
    }

    async fn update_lesson(&self, lesson: &Lesson) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if !data.lessons.contains_key(&lesson.id) {
            return Err(missing("Lesson"));
        }
        if data.lesson_slot_taken(lesson) {
            return Err(conflict(
                "a lesson for this class and discipline already exists on this date",
            ));
        }
        data.lessons.insert(lesson.id, lesson.clone());
        Ok(())
    }

    async fn get_lesson(&self, id: LessonId) -> StoreResult<Option<Lesson>> {
        Ok(self.data.read().await.lessons.get(&id).cloned())
    }

    async fn list_lessons(&self) -> StoreResult<Vec<Lesson>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.lessons, |l| (l.date, l.id)))
    }

    async fn upsert_attendance(
        &self,
        lesson_id: LessonId,
        entries: &[AttendanceEntry],
    ) -> StoreResult<Vec<Attendance>> {
        let mut data = self.data.write().await;
        if !data.lessons.contains_key(&lesson_id) {
            return Err(missing("Lesson"));
        }

        let mut written = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = (lesson_id, entry.student_id);
            let id = data
                .attendance
                .get(&key)
                .map(|existing| existing.id)
                .unwrap_or_else(AttendanceId::new);
            let record = Attendance {
                id,
                lesson_id,
                student_id: entry.student_id,
                status: entry.status,
                note: entry.note.clone(),
            };
            data.attendance.insert(key, record.clone());
            written.push(record);
        }
        Ok(written)
    }

    async fn list_attendance_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> StoreResult<Vec<Attendance>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.attendance, |a| (a.student_id, a.id))
            .into_iter()
            .filter(|a| a.lesson_id == lesson_id)
            .collect())
    }

    async fn list_attendance_for_student(
        &self,
        student_id: StudentId,
    ) -> StoreResult<Vec<Attendance>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.attendance, |a| (a.lesson_id, a.id))
            .into_iter()
            .filter(|a| a.student_id == student_id)
            .collect())
    }

    async fn list_attendance_for_class(&self, class_id: ClassId) -> StoreResult<Vec<Attendance>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.attendance, |a| (a.lesson_id, a.student_id))
            .into_iter()
            .filter(|a| {
                data.lessons
                    .get(&a.lesson_id)
                    .is_some_and(|lesson| lesson.class_id == class_id)
            })
            .collect())
    }

    async fn insert_assessment(&self, assessment: &Assessment) -> StoreResult<()> {
        self.data
            .write()
            .await
            .assessments
            .insert(assessment.id, assessment.clone());
        Ok(())
    }

    async fn update_assessment(&self, assessment: &Assessment) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .assessments
            .get_mut(&assessment.id)
            .ok_or_else(|| missing("Assessment"))?;
        *slot = assessment.clone();
        Ok(())
    }

    async fn get_assessment(&self, id: AssessmentId) -> StoreResult<Option<Assessment>> {
        Ok(self.data.read().await.assessments.get(&id).cloned())
    }

    async fn list_assessments(&self) -> StoreResult<Vec<Assessment>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.assessments, |a| (a.date, a.name.clone(), a.id)))
    }

    async fn upsert_grades(
        &self,
        assessment_id: AssessmentId,
        entries: &[GradeEntry],
    ) -> StoreResult<Vec<Grade>> {
        let mut data = self.data.write().await;
        if !data.assessments.contains_key(&assessment_id) {
            return Err(missing("Assessment"));
        }

        let mut written = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = (assessment_id, entry.student_id);
            let id = data
                .grades
                .get(&key)
                .map(|existing| existing.id)
                .unwrap_or_else(GradeId::new);
            let grade = Grade {
                id,
                assessment_id,
                student_id: entry.student_id,
                value: entry.value,
                note: entry.note.clone(),
            };
            data.grades.insert(key, grade.clone());
            written.push(grade);
        }
        Ok(written)
    }

    async fn list_grades_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> StoreResult<Vec<Grade>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.grades, |g| (g.student_id, g.id))
            .into_iter()
            .filter(|g| g.assessment_id == assessment_id)
            .collect())
    }

    async fn list_grades_for_student(&self, student_id: StudentId) -> StoreResult<Vec<Grade>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.grades, |g| (g.assessment_id, g.id))
            .into_iter()
            .filter(|g| g.student_id == student_id)
            .collect())
    }

    async fn list_grades_for_class(&self, class_id: ClassId) -> StoreResult<Vec<Grade>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.grades, |g| (g.assessment_id, g.student_id))
            .into_iter()
            .filter(|g| {
                data.assessments
                    .get(&g.assessment_id)
                    .is_some_and(|assessment| assessment.class_id == class_id)
            })
            .collect())
    }
}

#[async_trait]
impl NoticeStore for MemoryStore {
    async fn insert_announcement(&self, announcement: &Announcement) -> StoreResult<()> {
        self.data
            .write()
            .await
            .announcements
            .insert(announcement.id, announcement.clone());
        Ok(())
    }

    async fn get_announcement(&self, id: AnnouncementId) -> StoreResult<Option<Announcement>> {
        Ok(self.data.read().await.announcements.get(&id).cloned())
    }

    async fn list_announcements(&self) -> StoreResult<Vec<Announcement>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.announcements, |a| {
            (std::cmp::Reverse(a.send_at), a.id)
        }))
    }

    async fn mark_announcement_sent(&self, id: AnnouncementId) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let announcement = data
            .announcements
            .get_mut(&id)
            .ok_or_else(|| missing("Announcement"))?;
        announcement.sent = true;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_payable(&self, payable: &Payable) -> StoreResult<()> {
        self.data
            .write()
            .await
            .payables
            .insert(payable.id, payable.clone());
        Ok(())
    }

    async fn update_payable(&self, payable: &Payable) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .payables
            .get_mut(&payable.id)
            .ok_or_else(|| missing("Payable"))?;
        *slot = payable.clone();
        Ok(())
    }

    async fn get_payable(&self, id: PayableId) -> StoreResult<Option<Payable>> {
        Ok(self.data.read().await.payables.get(&id).cloned())
    }

    async fn list_payables(&self) -> StoreResult<Vec<Payable>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.payables, |p| (p.due_date, p.id)))
    }

    async fn insert_receivable(&self, receivable: &Receivable) -> StoreResult<()> {
        self.data
            .write()
            .await
            .receivables
            .insert(receivable.id, receivable.clone());
        Ok(())
    }

    async fn update_receivable(&self, receivable: &Receivable) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .receivables
            .get_mut(&receivable.id)
            .ok_or_else(|| missing("Receivable"))?;
        *slot = receivable.clone();
        Ok(())
    }

    async fn get_receivable(&self, id: ReceivableId) -> StoreResult<Option<Receivable>> {
        Ok(self.data.read().await.receivables.get(&id).cloned())
    }

    async fn list_receivables(&self) -> StoreResult<Vec<Receivable>> {
        let data = self.data.read().await;
        Ok(sorted_by(&data.receivables, |r| (r.due_date, r.id)))
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_settings(&self) -> StoreResult<Option<SchoolSettings>> {
        Ok(self.data.read().await.settings.clone())
    }

    async fn save_settings(&self, settings: &SchoolSettings) -> StoreResult<()> {
        self.data.write().await.settings = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sisprof_core::Role;
    use sisprof_models::{AttendanceStatus, Email, NotificationPreference};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn teacher(email: &str) -> Teacher {
        Teacher {
            id: TeacherId::new(),
            account_id: None,
            name: "João".to_string(),
            birth_date: date(1980, 1, 1),
            email: Email::new(email).unwrap(),
            phone: "1".to_string(),
            notification: NotificationPreference::Email,
            active: true,
            discipline_ids: vec![],
            class_ids: vec![],
        }
    }

    fn request(base: &str, email: &str) -> AccountRequest {
        AccountRequest {
            base_username: base.to_string(),
            email: Email::new(email).unwrap(),
            password_hash: "hash".to_string(),
            role: Role::Teacher,
        }
    }

    fn lesson(class_id: ClassId, discipline_id: DisciplineId, day: NaiveDate) -> Lesson {
        Lesson {
            id: LessonId::new(),
            class_id,
            discipline_id,
            teacher_id: TeacherId::new(),
            date: day,
            content: None,
        }
    }

    #[tokio::test]
    async fn test_provisioning_suffixes() {
        let store = MemoryStore::new();
        let mut usernames = vec![];
        for email in ["joao@a.com", "joao@b.com", "joao@c.com"] {
            let (teacher, account) = store
                .insert_teacher(&teacher(email), Some(&request("joao", email)))
                .await
                .unwrap();
            let account = account.unwrap();
            assert_eq!(teacher.account_id, Some(account.id));
            assert_eq!(account.roles, vec![Role::Teacher]);
            usernames.push(account.username);
        }
        assert_eq!(usernames, vec!["joao", "joao1", "joao2"]);
    }

    #[tokio::test]
    async fn test_overlapping_bases_never_share_a_username() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let provision = |base: &'static str, email: &'static str| {
            let store = store.clone();
            async move {
                store
                    .insert_teacher(&teacher(email), Some(&request(base, email)))
                    .await
                    .map(|(_, account)| account.map(|a| a.username))
            }
        };

        let (first, second, third) = tokio::join!(
            provision("joao1", "joao1@a.com"),
            provision("joao", "joao@a.com"),
            provision("joao", "joao@b.com"),
        );
        let mut usernames: Vec<String> = [first, second, third]
            .into_iter()
            .map(|result| result.unwrap().unwrap())
            .collect();
        usernames.sort();
        usernames.dedup();

        assert_eq!(usernames.len(), 3);
        assert!(usernames.iter().all(|name| name.starts_with("joao")));
    }

    #[tokio::test]
    async fn test_linking_missing_account_writes_nothing() {
        let store = MemoryStore::new();
        let mut record = teacher("ana@escola.com");
        record.account_id = Some(AccountId::new());

        let err = store.insert_teacher(&record, None).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
        assert!(store.list_teachers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_account_cannot_be_linked_twice() {
        let store = MemoryStore::new();
        let (first, _) = store
            .insert_teacher(&teacher("ana@escola.com"), Some(&request("ana", "ana@escola.com")))
            .await
            .unwrap();

        let mut second = teacher("ana2@escola.com");
        second.account_id = first.account_id;
        let err = store.insert_teacher(&second, None).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 409);
    }

    #[tokio::test]
    async fn test_duplicate_lesson_conflicts() {
        let store = MemoryStore::new();
        let (class_id, discipline_id) = (ClassId::new(), DisciplineId::new());
        let day = date(2024, 3, 4);

        store
            .insert_lesson(&lesson(class_id, discipline_id, day))
            .await
            .unwrap();
        let err = store
            .insert_lesson(&lesson(class_id, discipline_id, day))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 409);

        store
            .insert_lesson(&lesson(class_id, discipline_id, date(2024, 3, 5)))
            .await
            .unwrap();
        assert_eq!(store.list_lessons().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_attendance_upsert_keeps_one_row() {
        let store = MemoryStore::new();
        let lesson = lesson(ClassId::new(), DisciplineId::new(), date(2024, 3, 4));
        store.insert_lesson(&lesson).await.unwrap();
        let student_id = StudentId::new();

        let first = store
            .upsert_attendance(
                lesson.id,
                &[AttendanceEntry {
                    student_id,
                    status: AttendanceStatus::Absent,
                    note: None,
                }],
            )
            .await
            .unwrap();
        let second = store
            .upsert_attendance(
                lesson.id,
                &[AttendanceEntry {
                    student_id,
                    status: AttendanceStatus::Excused,
                    note: Some("atestado".to_string()),
                }],
            )
            .await
            .unwrap();

        assert_eq!(first[0].id, second[0].id);
        let rows = store.list_attendance_for_lesson(lesson.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, AttendanceStatus::Excused);
        assert_eq!(rows[0].note.as_deref(), Some("atestado"));
    }

    #[tokio::test]
    async fn test_guardian_is_unique_per_student_and_deletable() {
        let store = MemoryStore::new();
        let student_id = StudentId::new();
        let guardian = Guardian {
            id: GuardianId::new(),
            student_id,
            name: "Marta".to_string(),
            birth_date: date(1970, 1, 1),
            email: Email::new("marta@mail.com").unwrap(),
            phone: "1".to_string(),
            notification: NotificationPreference::Sms,
            relationship: "Mãe".to_string(),
            cpf: None,
        };
        store.insert_guardian(&guardian).await.unwrap();

        let second = Guardian {
            id: GuardianId::new(),
            ..guardian.clone()
        };
        assert_eq!(
            store.insert_guardian(&second).await.unwrap_err().status.as_u16(),
            409
        );

        assert!(store.delete_guardian(guardian.id).await.unwrap());
        assert!(!store.delete_guardian(guardian.id).await.unwrap());
        assert!(store.get_guardian(guardian.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load_settings().await.unwrap().is_none());

        let settings = SchoolSettings {
            school_name: "Escola Estadual".to_string(),
            current_school_year: 2025,
        };
        store.save_settings(&settings).await.unwrap();
        assert_eq!(store.load_settings().await.unwrap(), Some(settings));
    }
}
