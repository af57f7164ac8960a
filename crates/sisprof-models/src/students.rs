//! Student models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sisprof_core::{PaginationMeta, PaginationParams, serde::empty_string_as_none};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::identity::ProvisionedCredentials;
use crate::ids::{AccountId, ClassId, StudentId};
use crate::people::{NotificationPreference, default_active, name_contains};
use crate::value_types::{Email, validate_letters_only};

/// A student and the classes they are enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub account_id: Option<AccountId>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub email: Email,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub notification: NotificationPreference,
    pub active: bool,
    pub class_ids: Vec<ClassId>,
}

impl Student {
    pub fn is_enrolled_in(&self, class_id: ClassId) -> bool {
        self.class_ids.contains(&class_id)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
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
    pub class_ids: Vec<ClassId>,
    /// Link an existing login identity instead of provisioning a new one.
    pub account_id: Option<AccountId>,
}

/// All fields are optional; only provided fields are updated.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100), custom(function = "validate_letters_only"))]
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    pub notification: Option<NotificationPreference>,
    pub active: Option<bool>,
    pub class_ids: Option<Vec<ClassId>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<ClassId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl StudentFilterParams {
    pub fn matches(&self, student: &Student) -> bool {
        name_contains(&student.name, self.name.as_deref())
            && self.active.is_none_or(|active| student.active == active)
            && self.class_id.is_none_or(|id| student.is_enrolled_in(id))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentCreatedResponse {
    pub student: Student,
    pub credentials: Option<ProvisionedCredentials>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateStudentDto {
        CreateStudentDto {
            name: "Ana Clara".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 3, 9).unwrap(),
            email: "ana@escola.com".to_string(),
            phone: "11999990000".to_string(),
            notification: NotificationPreference::Whatsapp,
            active: true,
            class_ids: vec![],
            account_id: None,
        }
    }

    #[test]
    fn test_create_student_dto_validation() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn test_create_student_dto_double_space_in_name() {
        let dto = CreateStudentDto {
            name: "Ana  Clara".to_string(),
            ..create_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_student_dto_long_phone() {
        let dto = CreateStudentDto {
            phone: "9".repeat(21),
            ..create_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_student_dto_invalid_email() {
        let dto: UpdateStudentDto = serde_json::from_str(r#"{"email":"invalid"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_filter_by_class() {
        let class_id = ClassId::new();
        let student = Student {
            id: StudentId::new(),
            account_id: None,
            name: "Ana".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 3, 9).unwrap(),
            email: Email::new("ana@escola.com").unwrap(),
            phone: "1".to_string(),
            notification: NotificationPreference::Email,
            active: true,
            class_ids: vec![class_id],
        };

        let filter = StudentFilterParams {
            class_id: Some(class_id),
            ..Default::default()
        };
        assert!(filter.matches(&student));

        let other = StudentFilterParams {
            class_id: Some(ClassId::new()),
            ..Default::default()
        };
        assert!(!other.matches(&student));
    }
}
