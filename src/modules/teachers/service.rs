use anyhow::anyhow;
use sisprof_config::ProvisioningConfig;
use sisprof_core::{AppError, Role};
use sisprof_db::Store;
use sisprof_models::Teacher;
use sisprof_models::ids::TeacherId;
use sisprof_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, TeacherCreatedResponse, TeacherFilterParams,
    UpdateTeacherDto,
};
use tracing::instrument;

use crate::modules::accounts::{AccountService, service::parse_email};
use crate::modules::classes::service::ClassService;
use crate::modules::disciplines::service::DisciplineService;

pub struct TeacherService;

impl TeacherService {
    /// Creates the teacher and, unless an existing login is linked, a new
    /// login identity in the same store transaction.
    #[instrument(skip(store, config))]
    pub async fn create_teacher(
        store: &dyn Store,
        dto: CreateTeacherDto,
        config: &ProvisioningConfig,
    ) -> Result<TeacherCreatedResponse, AppError> {
        let email = parse_email(&dto.email)?;
        DisciplineService::ensure_exist(store, &dto.discipline_ids, "discipline_ids").await?;
        ClassService::ensure_exist(store, &dto.class_ids, "class_ids").await?;

        let pending = AccountService::prepare_unless_linked(
            dto.account_id.is_some(),
            &email,
            Role::Teacher,
            config,
        )?;

        let teacher = Teacher {
            id: TeacherId::new(),
            account_id: dto.account_id,
            name: dto.name,
            birth_date: dto.birth_date,
            email,
            phone: dto.phone,
            notification: dto.notification,
            active: dto.active,
            discipline_ids: dto.discipline_ids,
            class_ids: dto.class_ids,
        };

        let (teacher, account) = store
            .insert_teacher(&teacher, pending.as_ref().map(|p| &p.request))
            .await?;

        Ok(TeacherCreatedResponse {
            teacher,
            credentials: AccountService::finish(pending, account),
        })
    }

    #[instrument(skip(store))]
    pub async fn get_teachers(
        store: &dyn Store,
        filters: TeacherFilterParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let teachers: Vec<Teacher> = store
            .list_teachers()
            .await?
            .into_iter()
            .filter(|teacher| filters.matches(teacher))
            .collect();

        let (data, meta) = filters.pagination.apply(teachers);
        Ok(PaginatedTeachersResponse { data, meta })
    }

    #[instrument(skip(store))]
    pub async fn get_teacher(store: &dyn Store, id: TeacherId) -> Result<Teacher, AppError> {
        store
            .get_teacher(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_teacher(
        store: &dyn Store,
        id: TeacherId,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let mut teacher = Self::get_teacher(store, id).await?;

        if let Some(name) = dto.name {
            teacher.name = name;
        }
        if let Some(birth_date) = dto.birth_date {
            teacher.birth_date = birth_date;
        }
        if let Some(email) = dto.email {
            teacher.email = parse_email(&email)?;
        }
        if let Some(phone) = dto.phone {
            teacher.phone = phone;
        }
        if let Some(notification) = dto.notification {
            teacher.notification = notification;
        }
        if let Some(active) = dto.active {
            teacher.active = active;
        }
        if let Some(discipline_ids) = dto.discipline_ids {
            DisciplineService::ensure_exist(store, &discipline_ids, "discipline_ids").await?;
            teacher.discipline_ids = discipline_ids;
        }
        if let Some(class_ids) = dto.class_ids {
            ClassService::ensure_exist(store, &class_ids, "class_ids").await?;
            teacher.class_ids = class_ids;
        }

        store.update_teacher(&teacher).await?;
        Ok(teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sisprof_core::verify_password;
    use sisprof_db::{DirectoryStore, IdentityStore, MemoryStore};
    use sisprof_models::NotificationPreference;
    use sisprof_models::ids::AccountId;

    fn config() -> ProvisioningConfig {
        ProvisioningConfig {
            password_length: 10,
            bcrypt_cost: 4,
        }
    }

    fn create_dto(name: &str, email: &str) -> CreateTeacherDto {
        CreateTeacherDto {
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1980, 3, 9).unwrap(),
            email: email.to_string(),
            phone: "(11) 91234-5678".to_string(),
            notification: NotificationPreference::Email,
            active: true,
            discipline_ids: vec![],
            class_ids: vec![],
            account_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_provisions_login() {
        let store = MemoryStore::new();
        let created = TeacherService::create_teacher(
            &store,
            create_dto("João Silva", "Joao@escola.com"),
            &config(),
        )
        .await
        .unwrap();

        let credentials = created.credentials.unwrap();
        assert_eq!(credentials.username, "joao");
        assert_eq!(credentials.password.len(), 10);

        let account = store.find_account_by_username("joao").await.unwrap().unwrap();
        assert_eq!(created.teacher.account_id, Some(account.id));
        assert!(account.has_role(Role::Teacher));
        assert!(verify_password(&credentials.password, &account.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_colliding_usernames_get_suffixes() {
        let store = MemoryStore::new();
        let mut usernames = Vec::new();
        for email in ["joao@escola.com", "joao@outra.com", "JOAO@terceira.com"] {
            let created = TeacherService::create_teacher(&store, create_dto("João", email), &config())
                .await
                .unwrap();
            usernames.push(created.credentials.unwrap().username);
        }
        assert_eq!(usernames, vec!["joao", "joao1", "joao2"]);
    }

    #[tokio::test]
    async fn test_linking_unknown_account_writes_nothing() {
        let store = MemoryStore::new();
        let dto = CreateTeacherDto {
            account_id: Some(AccountId::new()),
            ..create_dto("Maria", "maria@escola.com")
        };

        let err = TeacherService::create_teacher(&store, dto, &config()).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
        assert!(store.list_teachers().await.unwrap().is_empty());
        assert!(store.find_account_by_username("maria").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_with_unknown_class_changes_nothing() {
        let store = MemoryStore::new();
        let created = TeacherService::create_teacher(&store, create_dto("Maria", "maria@escola.com"), &config())
            .await
            .unwrap();

        let err = TeacherService::update_teacher(
            &store,
            created.teacher.id,
            UpdateTeacherDto {
                name: None,
                birth_date: None,
                email: None,
                phone: None,
                notification: None,
                active: Some(false),
                discipline_ids: None,
                class_ids: Some(vec![sisprof_models::ids::ClassId::new()]),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);

        let unchanged = TeacherService::get_teacher(&store, created.teacher.id).await.unwrap();
        assert!(unchanged.active);
    }
}
