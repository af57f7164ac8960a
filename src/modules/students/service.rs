use anyhow::anyhow;
use sisprof_config::ProvisioningConfig;
use sisprof_core::{AppError, Role};
use sisprof_db::Store;
use sisprof_models::Student;
use sisprof_models::ids::StudentId;
use sisprof_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, StudentCreatedResponse, StudentFilterParams,
    UpdateStudentDto,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::accounts::{AccountService, service::parse_email};
use crate::modules::classes::service::ClassService;
use crate::utils::auth_helpers::student_for;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(store, config))]
    pub async fn create_student(
        store: &dyn Store,
        dto: CreateStudentDto,
        config: &ProvisioningConfig,
    ) -> Result<StudentCreatedResponse, AppError> {
        let email = parse_email(&dto.email)?;
        ClassService::ensure_exist(store, &dto.class_ids, "class_ids").await?;

        let pending = AccountService::prepare_unless_linked(
            dto.account_id.is_some(),
            &email,
            Role::Student,
            config,
        )?;

        let student = Student {
            id: StudentId::new(),
            account_id: dto.account_id,
            name: dto.name,
            birth_date: dto.birth_date,
            email,
            phone: dto.phone,
            notification: dto.notification,
            active: dto.active,
            class_ids: dto.class_ids,
        };

        let (student, account) = store
            .insert_student(&student, pending.as_ref().map(|p| &p.request))
            .await?;

        Ok(StudentCreatedResponse {
            student,
            credentials: AccountService::finish(pending, account),
        })
    }

    #[instrument(skip(store))]
    pub async fn get_students(
        store: &dyn Store,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let students: Vec<Student> = store
            .list_students()
            .await?
            .into_iter()
            .filter(|student| filters.matches(student))
            .collect();

        let (data, meta) = filters.pagination.apply(students);
        Ok(PaginatedStudentsResponse { data, meta })
    }

    #[instrument(skip(store))]
    pub async fn get_student(store: &dyn Store, id: StudentId) -> Result<Student, AppError> {
        store
            .get_student(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// Directors and teachers read any student; a student reads only their
    /// own record.
    #[instrument(skip(store))]
    pub async fn ensure_can_view(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: StudentId,
    ) -> Result<(), AppError> {
        if auth_user.has_any_role(&[Role::Director, Role::Teacher]) {
            return Ok(());
        }

        let own = student_for(store, auth_user).await?;
        if own.is_some_and(|student| student.id == id) {
            return Ok(());
        }

        sisprof_observability::track_access_denied("view_student");
        Err(AppError::forbidden(
            "Access denied. Students may only view their own record",
        ))
    }

    #[instrument(skip(store))]
    pub async fn update_student(
        store: &dyn Store,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let mut student = Self::get_student(store, id).await?;

        if let Some(name) = dto.name {
            student.name = name;
        }
        if let Some(birth_date) = dto.birth_date {
            student.birth_date = birth_date;
        }
        if let Some(email) = dto.email {
            student.email = parse_email(&email)?;
        }
        if let Some(phone) = dto.phone {
            student.phone = phone;
        }
        if let Some(notification) = dto.notification {
            student.notification = notification;
        }
        if let Some(active) = dto.active {
            student.active = active;
        }
        if let Some(class_ids) = dto.class_ids {
            ClassService::ensure_exist(store, &class_ids, "class_ids").await?;
            student.class_ids = class_ids;
        }

        store.update_student(&student).await?;
        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sisprof_auth::Claims;
    use sisprof_models::NotificationPreference;
    use sisprof_db::MemoryStore;

    fn config() -> ProvisioningConfig {
        ProvisioningConfig {
            password_length: 12,
            bcrypt_cost: 4,
        }
    }

    fn create_dto(name: &str, email: &str) -> CreateStudentDto {
        CreateStudentDto {
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 8, 1).unwrap(),
            email: email.to_string(),
            phone: "1234-5678".to_string(),
            notification: NotificationPreference::Whatsapp,
            active: true,
            class_ids: vec![],
            account_id: None,
        }
    }

    fn auth_user(sub: String, roles: Vec<Role>) -> AuthUser {
        AuthUser(Claims {
            sub,
            username: "someone".to_string(),
            roles,
            exp: 9999999999,
            iat: 0,
        })
    }

    #[tokio::test]
    async fn test_create_uses_configured_password_length() {
        let store = MemoryStore::new();
        let created = StudentService::create_student(&store, create_dto("Ana", "ana@escola.com"), &config())
            .await
            .unwrap();
        assert_eq!(created.credentials.unwrap().password.len(), 12);
        assert!(created.student.account_id.is_some());
    }

    #[tokio::test]
    async fn test_student_views_only_own_record() {
        let store = MemoryStore::new();
        let ana = StudentService::create_student(&store, create_dto("Ana", "ana@escola.com"), &config())
            .await
            .unwrap()
            .student;
        let bia = StudentService::create_student(&store, create_dto("Bia", "bia@escola.com"), &config())
            .await
            .unwrap()
            .student;

        let ana_login = auth_user(ana.account_id.unwrap().to_string(), vec![Role::Student]);
        assert!(StudentService::ensure_can_view(&store, &ana_login, ana.id).await.is_ok());

        let err = StudentService::ensure_can_view(&store, &ana_login, bia.id)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[tokio::test]
    async fn test_staff_cannot_view_students() {
        let store = MemoryStore::new();
        let staff = auth_user(uuid::Uuid::new_v4().to_string(), vec![Role::Staff]);
        let err = StudentService::ensure_can_view(&store, &staff, StudentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }
}
