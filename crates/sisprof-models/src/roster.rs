//! Checks a per-student submission against a class roster.

use std::collections::HashSet;
use std::fmt;

use crate::ids::StudentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterViolation {
    NotEnrolled(StudentId),
    Duplicate(StudentId),
}

impl fmt::Display for RosterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterViolation::NotEnrolled(id) => {
                write!(f, "student {} is not enrolled in this class", id)
            }
            RosterViolation::Duplicate(id) => {
                write!(f, "student {} appears more than once", id)
            }
        }
    }
}

impl std::error::Error for RosterViolation {}

/// Every submitted student must be on the roster and appear at most once.
///
/// Reports the first violation in submission order.
pub fn check_against_roster<I>(submitted: I, roster: &[StudentId]) -> Result<(), RosterViolation>
where
    I: IntoIterator<Item = StudentId>,
{
    let roster: HashSet<StudentId> = roster.iter().copied().collect();
    let mut seen = HashSet::new();

    for student_id in submitted {
        if !roster.contains(&student_id) {
            return Err(RosterViolation::NotEnrolled(student_id));
        }
        if !seen.insert(student_id) {
            return Err(RosterViolation::Duplicate(student_id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_of_roster_is_accepted() {
        let (a, b, c) = (StudentId::new(), StudentId::new(), StudentId::new());
        assert!(check_against_roster([a, c], &[a, b, c]).is_ok());
        assert!(check_against_roster([], &[a]).is_ok());
    }

    #[test]
    fn test_outsider_is_rejected() {
        let (a, outsider) = (StudentId::new(), StudentId::new());
        assert_eq!(
            check_against_roster([a, outsider], &[a]),
            Err(RosterViolation::NotEnrolled(outsider))
        );
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let a = StudentId::new();
        assert_eq!(
            check_against_roster([a, a], &[a]),
            Err(RosterViolation::Duplicate(a))
        );
    }
}
