//! Discipline (school subject) models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::DisciplineId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Discipline {
    pub id: DisciplineId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDisciplineDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDisciplineDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_discipline_dto_validation() {
        let valid = CreateDisciplineDto {
            name: "Matemática".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty = CreateDisciplineDto {
            name: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let long = CreateDisciplineDto {
            name: "x".repeat(101),
            description: None,
        };
        assert!(long.validate().is_err());
    }
}
