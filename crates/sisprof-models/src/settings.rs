//! School-wide settings: a single record.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_SCHOOL_NAME: &str = "Nome da Escola";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchoolSettings {
    pub school_name: String,
    pub current_school_year: i32,
}

impl Default for SchoolSettings {
    /// Used until a director saves the settings.
    fn default() -> Self {
        Self {
            school_name: DEFAULT_SCHOOL_NAME.to_string(),
            current_school_year: Utc::now().year(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsDto {
    #[validate(length(min = 1, max = 200))]
    pub school_name: Option<String>,
    #[validate(range(min = 1900, max = 2200))]
    pub current_school_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SchoolSettings::default();
        assert_eq!(settings.school_name, "Nome da Escola");
        assert_eq!(settings.current_school_year, Utc::now().year());
    }

    #[test]
    fn test_update_dto_validation() {
        let dto = UpdateSettingsDto {
            school_name: Some(String::new()),
            current_school_year: None,
        };
        assert!(dto.validate().is_err());
    }
}
