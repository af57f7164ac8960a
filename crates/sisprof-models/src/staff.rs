//! Non-teaching staff models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sisprof_core::serde::empty_string_as_none;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::identity::ProvisionedCredentials;
use crate::ids::{AccountId, StaffId};
use crate::people::{NotificationPreference, default_active, name_contains};
use crate::value_types::{Email, validate_letters_only};

text_enum! {
    pub enum StaffPosition {
        Janitor => "janitor",
        Doorkeeper => "doorkeeper",
        Canteen => "canteen",
        Secretary => "secretary",
    }
}

impl StaffPosition {
    pub const fn label(&self) -> &'static str {
        match self {
            StaffPosition::Janitor => "Zelador",
            StaffPosition::Doorkeeper => "Porteiro",
            StaffPosition::Canteen => "Cantineiro",
            StaffPosition::Secretary => "Secretário",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Staff {
    pub id: StaffId,
    pub account_id: Option<AccountId>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub email: Email,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub notification: NotificationPreference,
    #[sqlx(try_from = "String")]
    pub position: StaffPosition,
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStaffDto {
    #[validate(length(min = 1, max = 100), custom(function = "validate_letters_only"))]
    pub name: String,
    pub birth_date: NaiveDate,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[serde(default)]
    pub notification: NotificationPreference,
    pub position: StaffPosition,
    #[serde(default = "default_active")]
    pub active: bool,
    pub account_id: Option<AccountId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStaffDto {
    #[validate(length(min = 1, max = 100), custom(function = "validate_letters_only"))]
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    pub notification: Option<NotificationPreference>,
    pub position: Option<StaffPosition>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StaffFilterParams {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub position: Option<StaffPosition>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub active: Option<bool>,
}

impl StaffFilterParams {
    pub fn matches(&self, staff: &Staff) -> bool {
        name_contains(&staff.name, self.name.as_deref())
            && self.position.is_none_or(|position| staff.position == position)
            && self.active.is_none_or(|active| staff.active == active)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffCreatedResponse {
    pub staff: Staff,
    pub credentials: Option<ProvisionedCredentials>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tags() {
        assert_eq!(StaffPosition::Secretary.as_str(), "secretary");
        assert_eq!(StaffPosition::Secretary.label(), "Secretário");
        assert_eq!(
            "doorkeeper".parse::<StaffPosition>().unwrap(),
            StaffPosition::Doorkeeper
        );
        assert_eq!(StaffPosition::ALL.len(), 4);
    }

    #[test]
    fn test_create_staff_dto_requires_position() {
        let result = serde_json::from_str::<CreateStaffDto>(
            r#"{"name":"Carlos","birth_date":"1970-01-01","email":"carlos@escola.com","phone":"1"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_staff_dto_validation() {
        let dto: CreateStaffDto = serde_json::from_str(
            r#"{"name":"Carlos","birth_date":"1970-01-01","email":"carlos@escola.com","phone":"1","position":"janitor"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.active);
    }

    #[test]
    fn test_filter_by_position_from_query() {
        let filter: StaffFilterParams =
            serde_json::from_str(r#"{"position":"canteen","active":""}"#).unwrap();
        assert_eq!(filter.position, Some(StaffPosition::Canteen));
        assert_eq!(filter.active, None);
    }
}
