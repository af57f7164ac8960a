//! Teacher models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sisprof_core::{PaginationMeta, PaginationParams, serde::empty_string_as_none};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::identity::ProvisionedCredentials;
use crate::ids::{AccountId, ClassId, DisciplineId, TeacherId};
use crate::people::{NotificationPreference, default_active, name_contains};
use crate::value_types::{Email, validate_letters_only};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub account_id: Option<AccountId>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub email: Email,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub notification: NotificationPreference,
    pub active: bool,
    pub discipline_ids: Vec<DisciplineId>,
    pub class_ids: Vec<ClassId>,
}

impl Teacher {
    pub fn teaches_class(&self, class_id: ClassId) -> bool {
        self.class_ids.contains(&class_id)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 100), custom(function = "validate_letters_only"))]
    pub name: String,
    pub birth_date: NaiveDate,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[serde(default)]
    pub notification: NotificationPreference,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub discipline_ids: Vec<DisciplineId>,
    #[serde(default)]
    pub class_ids: Vec<ClassId>,
    /// Link an existing login identity instead of provisioning a new one.
    pub account_id: Option<AccountId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 100), custom(function = "validate_letters_only"))]
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    pub notification: Option<NotificationPreference>,
    pub active: Option<bool>,
    pub discipline_ids: Option<Vec<DisciplineId>>,
    pub class_ids: Option<Vec<ClassId>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherFilterParams {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<ClassId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub discipline_id: Option<DisciplineId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl TeacherFilterParams {
    pub fn matches(&self, teacher: &Teacher) -> bool {
        name_contains(&teacher.name, self.name.as_deref())
            && self.active.is_none_or(|active| teacher.active == active)
            && self.class_id.is_none_or(|id| teacher.class_ids.contains(&id))
            && self
                .discipline_id
                .is_none_or(|id| teacher.discipline_ids.contains(&id))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<Teacher>,
    pub meta: PaginationMeta,
}

/// Create response; `credentials` is present only when an identity was provisioned.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherCreatedResponse {
    pub teacher: Teacher,
    pub credentials: Option<ProvisionedCredentials>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateTeacherDto {
        CreateTeacherDto {
            name: "João da Silva".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1980, 5, 17).unwrap(),
            email: "joao@escola.com".to_string(),
            phone: "(11) 98765-4321".to_string(),
            notification: NotificationPreference::default(),
            active: true,
            discipline_ids: vec![],
            class_ids: vec![],
            account_id: None,
        }
    }

    #[test]
    fn test_create_teacher_dto_validation() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn test_create_teacher_dto_rejects_digits_in_name() {
        let dto = CreateTeacherDto {
            name: "João 2".to_string(),
            ..create_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_create_teacher_dto_invalid_email() {
        let dto = CreateTeacherDto {
            email: "joao".to_string(),
            ..create_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_teacher_dto_defaults() {
        let dto: CreateTeacherDto = serde_json::from_str(
            r#"{"name":"Ana","birth_date":"1990-01-02","email":"ana@escola.com","phone":"1234"}"#,
        )
        .unwrap();
        assert!(dto.active);
        assert_eq!(dto.notification, NotificationPreference::Email);
        assert!(dto.class_ids.is_empty());
    }

    #[test]
    fn test_update_teacher_dto_empty_is_valid() {
        let dto: UpdateTeacherDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_filter_matches() {
        let class_id = ClassId::new();
        let teacher = Teacher {
            id: TeacherId::new(),
            account_id: None,
            name: "Maria Souza".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
            email: Email::new("maria@escola.com").unwrap(),
            phone: "1234".to_string(),
            notification: NotificationPreference::Email,
            active: true,
            discipline_ids: vec![],
            class_ids: vec![class_id],
        };

        let by_class = TeacherFilterParams {
            class_id: Some(class_id),
            ..Default::default()
        };
        assert!(by_class.matches(&teacher));

        let inactive = TeacherFilterParams {
            active: Some(false),
            ..Default::default()
        };
        assert!(!inactive.matches(&teacher));

        let by_name = TeacherFilterParams {
            name: Some("souza".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&teacher));
    }
}
