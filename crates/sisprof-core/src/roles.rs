//! Access-control roles.
//!
//! Roles are a closed set. Membership checks are exact: a Director is not
//! implicitly a Teacher. The legacy group names are kept only as display
//! labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// School administration, full access.
    Director,
    /// Scoped to the classes, lessons and assessments the teacher owns.
    Teacher,
    /// Scoped to the student's own enrollment and records.
    Student,
    /// Login identity for non-teaching staff; grants no protected operation.
    Staff,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Director, Role::Teacher, Role::Student, Role::Staff];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Director => "director",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Staff => "staff",
        }
    }

    /// Group label shown to school users.
    pub const fn group_name(&self) -> &'static str {
        match self {
            Role::Director => "Diretoria",
            Role::Teacher => "Professores",
            Role::Student => "Alunos",
            Role::Staff => "Funcionarios",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Exact membership test.
pub fn has_role(roles: &[Role], role: Role) -> bool {
    roles.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_rejects_group_names() {
        assert!("Diretoria".parse::<Role>().is_err());
        assert!("professores".parse::<Role>().is_err());
    }

    #[test]
    fn test_has_role_is_exact() {
        let roles = vec![Role::Director];
        assert!(has_role(&roles, Role::Director));
        assert!(!has_role(&roles, Role::Teacher));
        assert!(!has_role(&roles, Role::Student));
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), r#""teacher""#);
        let role: Role = serde_json::from_str(r#""director""#).unwrap();
        assert_eq!(role, Role::Director);
    }

    #[test]
    fn test_group_names() {
        assert_eq!(Role::Director.group_name(), "Diretoria");
        assert_eq!(Role::Teacher.group_name(), "Professores");
        assert_eq!(Role::Student.group_name(), "Alunos");
    }
}
