//! PostgreSQL record store.
//!
//! Relation sets (class disciplines, teacher classes, enrollments, audiences)
//! live in link tables and are read back as `uuid[]` columns through
//! `ARRAY(SELECT ...)` subqueries, so every entity decodes with a single
//! `query_as`. Writes that touch more than one table run in a transaction.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use sisprof_core::{AppError, Role};
use sisprof_models::identity::next_available_username;
use sisprof_models::ids::{
    AccountId, AnnouncementId, AssessmentId, AssessmentTypeId, AttendanceId, ClassId,
    DisciplineId, GradeId, GuardianId, LessonId, PayableId, ReceivableId, StaffId, StudentId,
    TeacherId,
};
use sisprof_models::{
    AccountRequest, Announcement, Assessment, AssessmentType, Attendance, AttendanceEntry, Class,
    Discipline, Email, Grade, GradeEntry, Guardian, Lesson, NewAccount, Payable, Receivable,
    SchoolSettings, Staff, Student, Teacher, UserAccount,
};

use crate::store::{
    AcademicStore, DirectoryStore, IdentityStore, LedgerStore, NoticeStore, SettingsStore,
    StoreResult,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps constraint violations to client errors; everything else is a 500.
fn map_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::conflict(anyhow!(conflict_message(db_err.constraint())));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::unprocessable(anyhow!("Referenced record does not exist"));
        }
    }
    AppError::database(err)
}

fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("lessons_class_discipline_date_key") => {
            "A lesson for this class and discipline already exists on this date"
        }
        Some("guardians_student_id_key") => "Student already has a guardian",
        Some("accounts_username_key") => "Username is already taken",
        Some("teachers_account_id_key")
        | Some("students_account_id_key")
        | Some("staff_account_id_key") => "Account is already linked to another record",
        _ => "Record already exists",
    }
}

fn uuids<I, T>(ids: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = T>,
    T: Into<Uuid>,
{
    ids.into_iter().map(Into::into).collect()
}

/// Replaces the link rows of `owner` in a two-column link table.
async fn replace_links(
    conn: &mut PgConnection,
    table: &str,
    owner_col: &str,
    target_col: &str,
    owner: Uuid,
    targets: Vec<Uuid>,
) -> StoreResult<()> {
    sqlx::query(&format!("DELETE FROM {} WHERE {} = $1", table, owner_col))
        .bind(owner)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

    if targets.is_empty() {
        return Ok(());
    }

    sqlx::query(&format!(
        "INSERT INTO {} ({}, {}) SELECT $1, t FROM UNNEST($2::uuid[]) AS t ON CONFLICT DO NOTHING",
        table, owner_col, target_col
    ))
    .bind(owner)
    .bind(targets)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(FromRow)]
struct AccountRow {
    id: AccountId,
    username: String,
    email: Email,
    password_hash: String,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let roles = row
            .roles
            .iter()
            .map(|role| role.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::internal)?;

        Ok(UserAccount {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            roles,
            created_at: row.created_at,
        })
    }
}

const ACCOUNT_SELECT: &str = r#"
    SELECT a.id, a.username, a.email, a.password_hash, a.created_at,
           ARRAY(SELECT r.role FROM account_roles r WHERE r.account_id = a.id ORDER BY r.role) AS roles
    FROM accounts a
"#;

async fn insert_account_in(conn: &mut PgConnection, account: &NewAccount) -> StoreResult<UserAccount> {
    let created_at: DateTime<Utc> = sqlx::query_scalar(
        "INSERT INTO accounts (id, username, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING created_at",
    )
    .bind(account.id)
    .bind(&account.username)
    .bind(&account.email)
    .bind(&account.password_hash)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_db_error)?;

    let roles: Vec<String> = account.roles.iter().map(|r| r.as_str().to_string()).collect();
    sqlx::query(
        "INSERT INTO account_roles (account_id, role) SELECT $1, r FROM UNNEST($2::text[]) AS r",
    )
    .bind(account.id)
    .bind(&roles)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(UserAccount {
        id: account.id,
        username: account.username.clone(),
        email: account.email.clone(),
        password_hash: account.password_hash.clone(),
        roles: account.roles.clone(),
        created_at,
    })
}

/// Resolves the identity for a new person record inside `conn`'s transaction.
///
/// Advisory lock key shared by every provisioning transaction.
const PROVISIONING_LOCK_KEY: i64 = 0x5150_0001;

/// Provisioning is serialized by a transaction-scoped advisory lock on a
/// single key. Bases overlap (`joao` can become `joao1`, which is also a
/// base of its own), so a per-base lock is not enough.
async fn link_account_in(
    conn: &mut PgConnection,
    existing: Option<AccountId>,
    request: Option<&AccountRequest>,
) -> StoreResult<(Option<AccountId>, Option<UserAccount>)> {
    let Some(request) = request else {
        if let Some(account_id) = existing {
            let found: Option<Uuid> = sqlx::query_scalar("SELECT id FROM accounts WHERE id = $1")
                .bind(account_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(map_db_error)?;
            if found.is_none() {
                return Err(AppError::not_found(anyhow!("Account not found")));
            }
        }
        return Ok((existing, None));
    };

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(PROVISIONING_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

    let taken: Vec<String> = sqlx::query_scalar(
        "SELECT username FROM accounts WHERE left(username, char_length($1)) = $1",
    )
    .bind(&request.base_username)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    let username = next_available_username(&request.base_username, &taken);
    let account = insert_account_in(
        conn,
        &NewAccount {
            id: AccountId::new(),
            username,
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            roles: vec![request.role],
        },
    )
    .await?;

    Ok((Some(account.id), Some(account)))
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn insert_account(&self, account: &NewAccount) -> StoreResult<UserAccount> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let stored = insert_account_in(&mut tx, account).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(stored)
    }

    async fn get_account(&self, id: AccountId) -> StoreResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{} WHERE a.id = $1", ACCOUNT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.map(UserAccount::try_from).transpose()
    }

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        let row =
            sqlx::query_as::<_, AccountRow>(&format!("{} WHERE a.username = $1", ACCOUNT_SELECT))
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;
        row.map(UserAccount::try_from).transpose()
    }
}

// ============================================================================
// Directory
// ============================================================================

const CLASS_SELECT: &str = r#"
    SELECT c.id, c.name, c.shift, c.room, c.school_year,
           ARRAY(SELECT cd.discipline_id FROM class_disciplines cd WHERE cd.class_id = c.id ORDER BY cd.discipline_id) AS discipline_ids
    FROM classes c
"#;

const TEACHER_SELECT: &str = r#"
    SELECT t.id, t.account_id, t.name, t.birth_date, t.email, t.phone, t.notification, t.active,
           ARRAY(SELECT td.discipline_id FROM teacher_disciplines td WHERE td.teacher_id = t.id ORDER BY td.discipline_id) AS discipline_ids,
           ARRAY(SELECT tc.class_id FROM teacher_classes tc WHERE tc.teacher_id = t.id ORDER BY tc.class_id) AS class_ids
    FROM teachers t
"#;

const STUDENT_SELECT: &str = r#"
    SELECT s.id, s.account_id, s.name, s.birth_date, s.email, s.phone, s.notification, s.active,
           ARRAY(SELECT sc.class_id FROM student_classes sc WHERE sc.student_id = s.id ORDER BY sc.class_id) AS class_ids
    FROM students s
"#;

const STAFF_SELECT: &str = r#"
    SELECT id, account_id, name, birth_date, email, phone, notification, position, active
    FROM staff
"#;

const GUARDIAN_SELECT: &str = r#"
    SELECT id, student_id, name, birth_date, email, phone, notification, relationship, cpf
    FROM guardians
"#;

#[async_trait]
impl DirectoryStore for PgStore {
    async fn insert_discipline(&self, discipline: &Discipline) -> StoreResult<()> {
        sqlx::query("INSERT INTO disciplines (id, name, description) VALUES ($1, $2, $3)")
            .bind(discipline.id)
            .bind(&discipline.name)
            .bind(&discipline.description)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_discipline(&self, discipline: &Discipline) -> StoreResult<()> {
        sqlx::query("UPDATE disciplines SET name = $2, description = $3 WHERE id = $1")
            .bind(discipline.id)
            .bind(&discipline.name)
            .bind(&discipline.description)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_discipline(&self, id: DisciplineId) -> StoreResult<Option<Discipline>> {
        sqlx::query_as::<_, Discipline>(
            "SELECT id, name, description FROM disciplines WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_disciplines(&self) -> StoreResult<Vec<Discipline>> {
        sqlx::query_as::<_, Discipline>(
            "SELECT id, name, description FROM disciplines ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_class(&self, class: &Class) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query(
            "INSERT INTO classes (id, name, shift, room, school_year) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(class.id)
        .bind(&class.name)
        .bind(&class.shift)
        .bind(&class.room)
        .bind(class.school_year)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        replace_links(
            &mut tx,
            "class_disciplines",
            "class_id",
            "discipline_id",
            class.id.into_inner(),
            uuids(class.discipline_ids.iter().copied()),
        )
        .await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn update_class(&self, class: &Class) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query(
            "UPDATE classes SET name = $2, shift = $3, room = $4, school_year = $5 WHERE id = $1",
        )
        .bind(class.id)
        .bind(&class.name)
        .bind(&class.shift)
        .bind(&class.room)
        .bind(class.school_year)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        replace_links(
            &mut tx,
            "class_disciplines",
            "class_id",
            "discipline_id",
            class.id.into_inner(),
            uuids(class.discipline_ids.iter().copied()),
        )
        .await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn get_class(&self, id: ClassId) -> StoreResult<Option<Class>> {
        sqlx::query_as::<_, Class>(&format!("{} WHERE c.id = $1", CLASS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_classes(&self) -> StoreResult<Vec<Class>> {
        sqlx::query_as::<_, Class>(&format!(
            "{} ORDER BY c.school_year DESC, c.name, c.id",
            CLASS_SELECT
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_teacher(
        &self,
        teacher: &Teacher,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Teacher, Option<UserAccount>)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let (account_id, provisioned) = link_account_in(&mut tx, teacher.account_id, account).await?;

        sqlx::query(
            r#"
            INSERT INTO teachers (id, account_id, name, birth_date, email, phone, notification, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(teacher.id)
        .bind(account_id)
        .bind(&teacher.name)
        .bind(teacher.birth_date)
        .bind(&teacher.email)
        .bind(&teacher.phone)
        .bind(teacher.notification.as_str())
        .bind(teacher.active)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        write_teacher_links(&mut tx, teacher).await?;
        tx.commit().await.map_err(map_db_error)?;

        let stored = Teacher {
            account_id,
            ..teacher.clone()
        };
        Ok((stored, provisioned))
    }

    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query(
            r#"
            UPDATE teachers
            SET account_id = $2, name = $3, birth_date = $4, email = $5, phone = $6,
                notification = $7, active = $8
            WHERE id = $1
            "#,
        )
        .bind(teacher.id)
        .bind(teacher.account_id)
        .bind(&teacher.name)
        .bind(teacher.birth_date)
        .bind(&teacher.email)
        .bind(&teacher.phone)
        .bind(teacher.notification.as_str())
        .bind(teacher.active)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        write_teacher_links(&mut tx, teacher).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn get_teacher(&self, id: TeacherId) -> StoreResult<Option<Teacher>> {
        sqlx::query_as::<_, Teacher>(&format!("{} WHERE t.id = $1", TEACHER_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn find_teacher_by_account(
        &self,
        account_id: AccountId,
    ) -> StoreResult<Option<Teacher>> {
        sqlx::query_as::<_, Teacher>(&format!("{} WHERE t.account_id = $1", TEACHER_SELECT))
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        sqlx::query_as::<_, Teacher>(&format!("{} ORDER BY t.name, t.id", TEACHER_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn insert_student(
        &self,
        student: &Student,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Student, Option<UserAccount>)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let (account_id, provisioned) = link_account_in(&mut tx, student.account_id, account).await?;

        sqlx::query(
            r#"
            INSERT INTO students (id, account_id, name, birth_date, email, phone, notification, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(student.id)
        .bind(account_id)
        .bind(&student.name)
        .bind(student.birth_date)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(student.notification.as_str())
        .bind(student.active)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        replace_links(
            &mut tx,
            "student_classes",
            "student_id",
            "class_id",
            student.id.into_inner(),
            uuids(student.class_ids.iter().copied()),
        )
        .await?;
        tx.commit().await.map_err(map_db_error)?;

        let stored = Student {
            account_id,
            ..student.clone()
        };
        Ok((stored, provisioned))
    }

    async fn update_student(&self, student: &Student) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query(
            r#"
            UPDATE students
            SET account_id = $2, name = $3, birth_date = $4, email = $5, phone = $6,
                notification = $7, active = $8
            WHERE id = $1
            "#,
        )
        .bind(student.id)
        .bind(student.account_id)
        .bind(&student.name)
        .bind(student.birth_date)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(student.notification.as_str())
        .bind(student.active)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        replace_links(
            &mut tx,
            "student_classes",
            "student_id",
            "class_id",
            student.id.into_inner(),
            uuids(student.class_ids.iter().copied()),
        )
        .await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn get_student(&self, id: StudentId) -> StoreResult<Option<Student>> {
        sqlx::query_as::<_, Student>(&format!("{} WHERE s.id = $1", STUDENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn find_student_by_account(
        &self,
        account_id: AccountId,
    ) -> StoreResult<Option<Student>> {
        sqlx::query_as::<_, Student>(&format!("{} WHERE s.account_id = $1", STUDENT_SELECT))
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        sqlx::query_as::<_, Student>(&format!("{} ORDER BY s.name, s.id", STUDENT_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_students_in_class(&self, class_id: ClassId) -> StoreResult<Vec<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            r#"{}
            WHERE EXISTS (SELECT 1 FROM student_classes sc WHERE sc.student_id = s.id AND sc.class_id = $1)
            ORDER BY s.name, s.id"#,
            STUDENT_SELECT
        ))
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_staff(
        &self,
        staff: &Staff,
        account: Option<&AccountRequest>,
    ) -> StoreResult<(Staff, Option<UserAccount>)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let (account_id, provisioned) = link_account_in(&mut tx, staff.account_id, account).await?;

        sqlx::query(
            r#"
            INSERT INTO staff (id, account_id, name, birth_date, email, phone, notification, position, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(staff.id)
        .bind(account_id)
        .bind(&staff.name)
        .bind(staff.birth_date)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(staff.notification.as_str())
        .bind(staff.position.as_str())
        .bind(staff.active)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;
        tx.commit().await.map_err(map_db_error)?;

        let stored = Staff {
            account_id,
            ..staff.clone()
        };
        Ok((stored, provisioned))
    }

    async fn update_staff(&self, staff: &Staff) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE staff
            SET account_id = $2, name = $3, birth_date = $4, email = $5, phone = $6,
                notification = $7, position = $8, active = $9
            WHERE id = $1
            "#,
        )
        .bind(staff.id)
        .bind(staff.account_id)
        .bind(&staff.name)
        .bind(staff.birth_date)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(staff.notification.as_str())
        .bind(staff.position.as_str())
        .bind(staff.active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_staff(&self, id: StaffId) -> StoreResult<Option<Staff>> {
        sqlx::query_as::<_, Staff>(&format!("{} WHERE id = $1", STAFF_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        sqlx::query_as::<_, Staff>(&format!("{} ORDER BY name, id", STAFF_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn insert_guardian(&self, guardian: &Guardian) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO guardians (id, student_id, name, birth_date, email, phone, notification, relationship, cpf)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(guardian.id)
        .bind(guardian.student_id)
        .bind(&guardian.name)
        .bind(guardian.birth_date)
        .bind(&guardian.email)
        .bind(&guardian.phone)
        .bind(guardian.notification.as_str())
        .bind(&guardian.relationship)
        .bind(&guardian.cpf)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_guardian(&self, guardian: &Guardian) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE guardians
            SET student_id = $2, name = $3, birth_date = $4, email = $5, phone = $6,
                notification = $7, relationship = $8, cpf = $9
            WHERE id = $1
            "#,
        )
        .bind(guardian.id)
        .bind(guardian.student_id)
        .bind(&guardian.name)
        .bind(guardian.birth_date)
        .bind(&guardian.email)
        .bind(&guardian.phone)
        .bind(guardian.notification.as_str())
        .bind(&guardian.relationship)
        .bind(&guardian.cpf)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_guardian(&self, id: GuardianId) -> StoreResult<Option<Guardian>> {
        sqlx::query_as::<_, Guardian>(&format!("{} WHERE id = $1", GUARDIAN_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_guardians(&self) -> StoreResult<Vec<Guardian>> {
        sqlx::query_as::<_, Guardian>(&format!("{} ORDER BY name, id", GUARDIAN_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn delete_guardian(&self, id: GuardianId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM guardians WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }
}

async fn write_teacher_links(conn: &mut PgConnection, teacher: &Teacher) -> StoreResult<()> {
    replace_links(
        conn,
        "teacher_disciplines",
        "teacher_id",
        "discipline_id",
        teacher.id.into_inner(),
        uuids(teacher.discipline_ids.iter().copied()),
    )
    .await?;
    replace_links(
        conn,
        "teacher_classes",
        "teacher_id",
        "class_id",
        teacher.id.into_inner(),
        uuids(teacher.class_ids.iter().copied()),
    )
    .await
}

// ============================================================================
// Academic
// ============================================================================

const LESSON_SELECT: &str =
    "SELECT id, class_id, discipline_id, teacher_id, date, content FROM lessons";

const ATTENDANCE_SELECT: &str =
    "SELECT a.id, a.lesson_id, a.student_id, a.status, a.note FROM attendance a";

const ASSESSMENT_SELECT: &str = r#"
    SELECT id, class_id, discipline_id, teacher_id, assessment_type_id, name, date, max_value, description
    FROM assessments
"#;

const GRADE_SELECT: &str =
    "SELECT g.id, g.assessment_id, g.student_id, g.value, g.note FROM grades g";

#[async_trait]
impl AcademicStore for PgStore {
    async fn insert_assessment_type(&self, assessment_type: &AssessmentType) -> StoreResult<()> {
        sqlx::query("INSERT INTO assessment_types (id, name, weight) VALUES ($1, $2, $3)")
            .bind(assessment_type.id)
            .bind(&assessment_type.name)
            .bind(assessment_type.weight)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_assessment_type(&self, assessment_type: &AssessmentType) -> StoreResult<()> {
        sqlx::query("UPDATE assessment_types SET name = $2, weight = $3 WHERE id = $1")
            .bind(assessment_type.id)
            .bind(&assessment_type.name)
            .bind(assessment_type.weight)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_assessment_type(
        &self,
        id: AssessmentTypeId,
    ) -> StoreResult<Option<AssessmentType>> {
        sqlx::query_as::<_, AssessmentType>(
            "SELECT id, name, weight FROM assessment_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_assessment_types(&self) -> StoreResult<Vec<AssessmentType>> {
        sqlx::query_as::<_, AssessmentType>(
            "SELECT id, name, weight FROM assessment_types ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_lesson(&self, lesson: &Lesson) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO lessons (id, class_id, discipline_id, teacher_id, date, content)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(lesson.id)
        .bind(lesson.class_id)
        .bind(lesson.discipline_id)
        .bind(lesson.teacher_id)
        .bind(lesson.date)
        .bind(&lesson.content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_lesson(&self, lesson: &Lesson) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE lessons
            SET class_id = $2, discipline_id = $3, teacher_id = $4, date = $5, content = $6
            WHERE id = $1
            "#,
        )
        .bind(lesson.id)
        .bind(lesson.class_id)
        .bind(lesson.discipline_id)
        .bind(lesson.teacher_id)
        .bind(lesson.date)
        .bind(&lesson.content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_lesson(&self, id: LessonId) -> StoreResult<Option<Lesson>> {
        sqlx::query_as::<_, Lesson>(&format!("{} WHERE id = $1", LESSON_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_lessons(&self) -> StoreResult<Vec<Lesson>> {
        sqlx::query_as::<_, Lesson>(&format!("{} ORDER BY date, id", LESSON_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn upsert_attendance(
        &self,
        lesson_id: LessonId,
        entries: &[AttendanceEntry],
    ) -> StoreResult<Vec<Attendance>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut written = Vec::with_capacity(entries.len());

        for entry in entries {
            let record = sqlx::query_as::<_, Attendance>(
                r#"
                INSERT INTO attendance (id, lesson_id, student_id, status, note)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (lesson_id, student_id)
                DO UPDATE SET status = EXCLUDED.status, note = EXCLUDED.note
                RETURNING id, lesson_id, student_id, status, note
                "#,
            )
            .bind(AttendanceId::new())
            .bind(lesson_id)
            .bind(entry.student_id)
            .bind(entry.status.as_str())
            .bind(&entry.note)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;
            written.push(record);
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(written)
    }

    async fn list_attendance_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> StoreResult<Vec<Attendance>> {
        sqlx::query_as::<_, Attendance>(&format!(
            "{} WHERE a.lesson_id = $1 ORDER BY a.student_id",
            ATTENDANCE_SELECT
        ))
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_attendance_for_student(
        &self,
        student_id: StudentId,
    ) -> StoreResult<Vec<Attendance>> {
        sqlx::query_as::<_, Attendance>(&format!(
            "{} WHERE a.student_id = $1 ORDER BY a.lesson_id",
            ATTENDANCE_SELECT
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_attendance_for_class(&self, class_id: ClassId) -> StoreResult<Vec<Attendance>> {
        sqlx::query_as::<_, Attendance>(&format!(
            r#"{}
            JOIN lessons l ON l.id = a.lesson_id
            WHERE l.class_id = $1
            ORDER BY a.lesson_id, a.student_id"#,
            ATTENDANCE_SELECT
        ))
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_assessment(&self, assessment: &Assessment) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO assessments
                (id, class_id, discipline_id, teacher_id, assessment_type_id, name, date, max_value, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(assessment.id)
        .bind(assessment.class_id)
        .bind(assessment.discipline_id)
        .bind(assessment.teacher_id)
        .bind(assessment.assessment_type_id)
        .bind(&assessment.name)
        .bind(assessment.date)
        .bind(assessment.max_value)
        .bind(&assessment.description)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_assessment(&self, assessment: &Assessment) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE assessments
            SET class_id = $2, discipline_id = $3, teacher_id = $4, assessment_type_id = $5,
                name = $6, date = $7, max_value = $8, description = $9
            WHERE id = $1
            "#,
        )
        .bind(assessment.id)
        .bind(assessment.class_id)
        .bind(assessment.discipline_id)
        .bind(assessment.teacher_id)
        .bind(assessment.assessment_type_id)
        .bind(&assessment.name)
        .bind(assessment.date)
        .bind(assessment.max_value)
        .bind(&assessment.description)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_assessment(&self, id: AssessmentId) -> StoreResult<Option<Assessment>> {
        sqlx::query_as::<_, Assessment>(&format!("{} WHERE id = $1", ASSESSMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_assessments(&self) -> StoreResult<Vec<Assessment>> {
        sqlx::query_as::<_, Assessment>(&format!(
            "{} ORDER BY date, name, id",
            ASSESSMENT_SELECT
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn upsert_grades(
        &self,
        assessment_id: AssessmentId,
        entries: &[GradeEntry],
    ) -> StoreResult<Vec<Grade>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut written = Vec::with_capacity(entries.len());

        for entry in entries {
            let grade = sqlx::query_as::<_, Grade>(
                r#"
                INSERT INTO grades (id, assessment_id, student_id, value, note)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (assessment_id, student_id)
                DO UPDATE SET value = EXCLUDED.value, note = EXCLUDED.note
                RETURNING id, assessment_id, student_id, value, note
                "#,
            )
            .bind(GradeId::new())
            .bind(assessment_id)
            .bind(entry.student_id)
            .bind(entry.value)
            .bind(&entry.note)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;
            written.push(grade);
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(written)
    }

    async fn list_grades_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> StoreResult<Vec<Grade>> {
        sqlx::query_as::<_, Grade>(&format!(
            "{} WHERE g.assessment_id = $1 ORDER BY g.student_id",
            GRADE_SELECT
        ))
        .bind(assessment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_grades_for_student(&self, student_id: StudentId) -> StoreResult<Vec<Grade>> {
        sqlx::query_as::<_, Grade>(&format!(
            "{} WHERE g.student_id = $1 ORDER BY g.assessment_id",
            GRADE_SELECT
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_grades_for_class(&self, class_id: ClassId) -> StoreResult<Vec<Grade>> {
        sqlx::query_as::<_, Grade>(&format!(
            r#"{}
            JOIN assessments x ON x.id = g.assessment_id
            WHERE x.class_id = $1
            ORDER BY g.assessment_id, g.student_id"#,
            GRADE_SELECT
        ))
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

// ============================================================================
// Announcements
// ============================================================================

const ANNOUNCEMENT_SELECT: &str = r#"
    SELECT n.id, n.title, n.message, n.kind, n.created_at, n.send_at, n.sender_id, n.sent,
           ARRAY(SELECT ac.class_id FROM announcement_classes ac WHERE ac.announcement_id = n.id ORDER BY ac.class_id) AS class_ids,
           ARRAY(SELECT ast.student_id FROM announcement_students ast WHERE ast.announcement_id = n.id ORDER BY ast.student_id) AS student_ids,
           ARRAY(SELECT at.teacher_id FROM announcement_teachers at WHERE at.announcement_id = n.id ORDER BY at.teacher_id) AS teacher_ids
    FROM announcements n
"#;

#[async_trait]
impl NoticeStore for PgStore {
    async fn insert_announcement(&self, announcement: &Announcement) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query(
            r#"
            INSERT INTO announcements (id, title, message, kind, created_at, send_at, sender_id, sent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(announcement.id)
        .bind(&announcement.title)
        .bind(&announcement.message)
        .bind(announcement.kind.as_str())
        .bind(announcement.created_at)
        .bind(announcement.send_at)
        .bind(announcement.sender_id)
        .bind(announcement.sent)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let owner = announcement.id.into_inner();
        replace_links(
            &mut tx,
            "announcement_classes",
            "announcement_id",
            "class_id",
            owner,
            uuids(announcement.class_ids.iter().copied()),
        )
        .await?;
        replace_links(
            &mut tx,
            "announcement_students",
            "announcement_id",
            "student_id",
            owner,
            uuids(announcement.student_ids.iter().copied()),
        )
        .await?;
        replace_links(
            &mut tx,
            "announcement_teachers",
            "announcement_id",
            "teacher_id",
            owner,
            uuids(announcement.teacher_ids.iter().copied()),
        )
        .await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn get_announcement(&self, id: AnnouncementId) -> StoreResult<Option<Announcement>> {
        sqlx::query_as::<_, Announcement>(&format!("{} WHERE n.id = $1", ANNOUNCEMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_announcements(&self) -> StoreResult<Vec<Announcement>> {
        sqlx::query_as::<_, Announcement>(&format!(
            "{} ORDER BY n.send_at DESC, n.id",
            ANNOUNCEMENT_SELECT
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn mark_announcement_sent(&self, id: AnnouncementId) -> StoreResult<()> {
        let result = sqlx::query("UPDATE announcements SET sent = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Announcement not found")));
        }
        Ok(())
    }
}

// ============================================================================
// Ledger
// ============================================================================

const PAYABLE_SELECT: &str = r#"
    SELECT id, description, category, amount_cents, due_date, paid_date, paid, note
    FROM payables
"#;

const RECEIVABLE_SELECT: &str = r#"
    SELECT id, student_id, description, amount_cents, due_date, received_date, received, note
    FROM receivables
"#;

#[async_trait]
impl LedgerStore for PgStore {
    async fn insert_payable(&self, payable: &Payable) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payables (id, description, category, amount_cents, due_date, paid_date, paid, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(payable.id)
        .bind(&payable.description)
        .bind(payable.category.as_str())
        .bind(payable.amount_cents)
        .bind(payable.due_date)
        .bind(payable.paid_date)
        .bind(payable.paid)
        .bind(&payable.note)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_payable(&self, payable: &Payable) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE payables
            SET description = $2, category = $3, amount_cents = $4, due_date = $5,
                paid_date = $6, paid = $7, note = $8
            WHERE id = $1
            "#,
        )
        .bind(payable.id)
        .bind(&payable.description)
        .bind(payable.category.as_str())
        .bind(payable.amount_cents)
        .bind(payable.due_date)
        .bind(payable.paid_date)
        .bind(payable.paid)
        .bind(&payable.note)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_payable(&self, id: PayableId) -> StoreResult<Option<Payable>> {
        sqlx::query_as::<_, Payable>(&format!("{} WHERE id = $1", PAYABLE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_payables(&self) -> StoreResult<Vec<Payable>> {
        sqlx::query_as::<_, Payable>(&format!("{} ORDER BY due_date, id", PAYABLE_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn insert_receivable(&self, receivable: &Receivable) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO receivables (id, student_id, description, amount_cents, due_date, received_date, received, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(receivable.id)
        .bind(receivable.student_id)
        .bind(&receivable.description)
        .bind(receivable.amount_cents)
        .bind(receivable.due_date)
        .bind(receivable.received_date)
        .bind(receivable.received)
        .bind(&receivable.note)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn update_receivable(&self, receivable: &Receivable) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE receivables
            SET student_id = $2, description = $3, amount_cents = $4, due_date = $5,
                received_date = $6, received = $7, note = $8
            WHERE id = $1
            "#,
        )
        .bind(receivable.id)
        .bind(receivable.student_id)
        .bind(&receivable.description)
        .bind(receivable.amount_cents)
        .bind(receivable.due_date)
        .bind(receivable.received_date)
        .bind(receivable.received)
        .bind(&receivable.note)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_receivable(&self, id: ReceivableId) -> StoreResult<Option<Receivable>> {
        sqlx::query_as::<_, Receivable>(&format!("{} WHERE id = $1", RECEIVABLE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_receivables(&self) -> StoreResult<Vec<Receivable>> {
        sqlx::query_as::<_, Receivable>(&format!("{} ORDER BY due_date, id", RECEIVABLE_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn load_settings(&self) -> StoreResult<Option<SchoolSettings>> {
        sqlx::query_as::<_, SchoolSettings>(
            "SELECT school_name, current_school_year FROM school_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn save_settings(&self, settings: &SchoolSettings) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO school_settings (id, school_name, current_school_year)
            VALUES (1, $1, $2)
            ON CONFLICT (id) DO UPDATE
            SET school_name = EXCLUDED.school_name, current_school_year = EXCLUDED.current_school_year
            "#,
        )
        .bind(&settings.school_name)
        .bind(settings.current_school_year)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}
