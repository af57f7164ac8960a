//! Guardian (responsável) models and DTOs.
//!
//! A guardian belongs to exactly one student and a student has at most one
//! guardian. Guardians are the only directory records that can be deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sisprof_core::serde::empty_string_as_none;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{GuardianId, StudentId};
use crate::people::NotificationPreference;
use crate::value_types::{Email, validate_letters_only};

pub const DEFAULT_RELATIONSHIP: &str = "Pai/Mãe";

fn default_relationship() -> String {
    DEFAULT_RELATIONSHIP.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Guardian {
    pub id: GuardianId,
    pub student_id: StudentId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub email: Email,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub notification: NotificationPreference,
    pub relationship: String,
    pub cpf: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGuardianDto {
    pub student_id: StudentId,
    #[validate(length(min = 1, max = 100), custom(function = "validate_letters_only"))]
    pub name: String,
    pub birth_date: NaiveDate,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[serde(default)]
    pub notification: NotificationPreference,
    #[serde(default = "default_relationship")]
    #[validate(length(min = 1, max = 50))]
    pub relationship: String,
    #[validate(length(max = 14))]
    pub cpf: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGuardianDto {
    #[validate(length(min = 1, max = 100), custom(function = "validate_letters_only"))]
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    pub notification: Option<NotificationPreference>,
    #[validate(length(min = 1, max = 50))]
    pub relationship: Option<String>,
    #[validate(length(max = 14))]
    pub cpf: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GuardianFilterParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<StudentId>,
}
