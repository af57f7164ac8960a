//! Class (turma) models and DTOs.

use serde::{Deserialize, Serialize};
use sisprof_core::{PaginationMeta, PaginationParams, serde::empty_string_as_none};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{ClassId, DisciplineId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub shift: String,
    pub room: String,
    pub school_year: i32,
    pub discipline_ids: Vec<DisciplineId>,
}

impl Class {
    /// "1A - Manhã - Sala 3"
    pub fn label(&self) -> String {
        format!("{} - {} - {}", self.name, self.shift, self.room)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub shift: String,
    #[validate(length(min = 1, max = 100))]
    pub room: String,
    /// Defaults to the school's current year.
    #[validate(range(min = 1900, max = 2200))]
    pub school_year: Option<i32>,
    #[serde(default)]
    pub discipline_ids: Vec<DisciplineId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub shift: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub room: Option<String>,
    #[validate(range(min = 1900, max = 2200))]
    pub school_year: Option<i32>,
    /// Replaces the class's disciplines when present.
    pub discipline_ids: Option<Vec<DisciplineId>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilterParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub school_year: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub discipline_id: Option<DisciplineId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ClassFilterParams {
    pub fn matches(&self, class: &Class) -> bool {
        self.school_year.is_none_or(|year| class.school_year == year)
            && self
                .discipline_id
                .is_none_or(|id| class.discipline_ids.contains(&id))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    pub data: Vec<Class>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(year: i32, disciplines: Vec<DisciplineId>) -> Class {
        Class {
            id: ClassId::new(),
            name: "1A".to_string(),
            shift: "Manhã".to_string(),
            room: "Sala 3".to_string(),
            school_year: year,
            discipline_ids: disciplines,
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(class(2024, vec![]).label(), "1A - Manhã - Sala 3");
    }

    #[test]
    fn test_create_class_dto_validation() {
        let valid = CreateClassDto {
            name: "1A".to_string(),
            shift: "Manhã".to_string(),
            room: "Sala 3".to_string(),
            school_year: Some(2024),
            discipline_ids: vec![],
        };
        assert!(valid.validate().is_ok());

        let bad_year = CreateClassDto {
            school_year: Some(24),
            ..valid
        };
        assert!(bad_year.validate().is_err());
    }

    #[test]
    fn test_filter_matches() {
        let math = DisciplineId::new();
        let filter = ClassFilterParams {
            school_year: Some(2024),
            discipline_id: Some(math),
            ..Default::default()
        };

        assert!(filter.matches(&class(2024, vec![math])));
        assert!(!filter.matches(&class(2023, vec![math])));
        assert!(!filter.matches(&class(2024, vec![])));
        assert!(ClassFilterParams::default().matches(&class(1999, vec![])));
    }
}
