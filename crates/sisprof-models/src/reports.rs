//! Derived statistics for students and classes.
//!
//! All figures are computed from recorded grades and attendance; nothing here
//! is stored.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::ids::{ClassId, DisciplineId, StudentId};
use crate::lessons::AttendanceStatus;

/// Arithmetic mean, 0 when there are no values.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceTally {
    pub present: u32,
    pub absent: u32,
    pub excused: u32,
}

impl AttendanceTally {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        statuses
            .into_iter()
            .fold(AttendanceTally::default(), |mut tally, status| {
                match status {
                    AttendanceStatus::Present => tally.present += 1,
                    AttendanceStatus::Absent => tally.absent += 1,
                    AttendanceStatus::Excused => tally.excused += 1,
                }
                tally
            })
    }

    pub fn total(&self) -> u32 {
        self.present + self.absent + self.excused
    }

    /// present / total * 100, always within [0, 100]; 0 when nothing is recorded.
    pub fn percentage(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.present) / f64::from(total) * 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DisciplineAverage {
    pub discipline_id: DisciplineId,
    pub discipline_name: String,
    pub average: f64,
    pub grades_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentReport {
    pub student_id: StudentId,
    pub student_name: String,
    /// Mean of every recorded grade value, 0 when none.
    pub average_grade: f64,
    pub grades_count: usize,
    pub attendance: AttendanceTally,
    pub attendance_percentage: f64,
    pub disciplines: Vec<DisciplineAverage>,
}

impl StudentReport {
    /// `grades` pairs each recorded value with the discipline of its
    /// assessment; `discipline_names` labels the per-discipline breakdown.
    pub fn build(
        student_id: StudentId,
        student_name: String,
        grades: &[(DisciplineId, f64)],
        statuses: &[AttendanceStatus],
        discipline_names: &BTreeMap<DisciplineId, String>,
    ) -> Self {
        let values: Vec<f64> = grades.iter().map(|(_, value)| *value).collect();

        let mut by_discipline: BTreeMap<DisciplineId, Vec<f64>> = BTreeMap::new();
        for (discipline_id, value) in grades {
            by_discipline.entry(*discipline_id).or_default().push(*value);
        }

        let mut disciplines: Vec<DisciplineAverage> = by_discipline
            .into_iter()
            .map(|(discipline_id, values)| DisciplineAverage {
                discipline_id,
                discipline_name: discipline_names
                    .get(&discipline_id)
                    .cloned()
                    .unwrap_or_default(),
                average: mean(&values),
                grades_count: values.len(),
            })
            .collect();
        disciplines.sort_by(|a, b| a.discipline_name.cmp(&b.discipline_name));

        let attendance = AttendanceTally::from_statuses(statuses.iter().copied());

        Self {
            student_id,
            student_name,
            average_grade: mean(&values),
            grades_count: values.len(),
            attendance,
            attendance_percentage: attendance.percentage(),
            disciplines,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassReport {
    pub class_id: ClassId,
    pub class_name: String,
    pub student_count: usize,
    pub lesson_count: usize,
    pub assessment_count: usize,
    /// Mean of every grade recorded for the class's assessments, 0 when none.
    pub average_grade: f64,
    pub attendance: AttendanceTally,
    pub attendance_percentage: f64,
}

impl ClassReport {
    pub fn build(
        class_id: ClassId,
        class_name: String,
        student_count: usize,
        lesson_count: usize,
        assessment_count: usize,
        grade_values: &[f64],
        statuses: &[AttendanceStatus],
    ) -> Self {
        let attendance = AttendanceTally::from_statuses(statuses.iter().copied());
        Self {
            class_id,
            class_name,
            student_count,
            lesson_count,
            assessment_count,
            average_grade: mean(grade_values),
            attendance,
            attendance_percentage: attendance.percentage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceStatus::*;

    #[test]
    fn test_mean_of_nothing_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[7.5, 9.0]), 8.25);
    }

    #[test]
    fn test_percentage_without_records_is_zero() {
        assert_eq!(AttendanceTally::default().percentage(), 0.0);
    }

    #[test]
    fn test_percentage_counts_excused_as_not_present() {
        let tally = AttendanceTally::from_statuses([Present, Present, Absent, Excused]);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.percentage(), 50.0);
    }

    #[test]
    fn test_percentage_stays_in_range() {
        for present in 0..5u32 {
            for absent in 0..5u32 {
                let tally = AttendanceTally {
                    present,
                    absent,
                    excused: 0,
                };
                let pct = tally.percentage();
                assert!((0.0..=100.0).contains(&pct));
            }
        }
    }

    #[test]
    fn test_student_report_breakdown() {
        let (math, history) = (DisciplineId::new(), DisciplineId::new());
        let names = BTreeMap::from([
            (math, "Matemática".to_string()),
            (history, "História".to_string()),
        ]);

        let report = StudentReport::build(
            StudentId::new(),
            "Ana".to_string(),
            &[(math, 8.0), (math, 6.0), (history, 10.0)],
            &[Present, Absent],
            &names,
        );

        assert_eq!(report.average_grade, 8.0);
        assert_eq!(report.grades_count, 3);
        assert_eq!(report.attendance_percentage, 50.0);
        assert_eq!(report.disciplines.len(), 2);
        assert_eq!(report.disciplines[0].discipline_name, "História");
        assert_eq!(report.disciplines[1].average, 7.0);
    }

    #[test]
    fn test_empty_student_report() {
        let report = StudentReport::build(
            StudentId::new(),
            "Ana".to_string(),
            &[],
            &[],
            &BTreeMap::new(),
        );
        assert_eq!(report.average_grade, 0.0);
        assert_eq!(report.attendance_percentage, 0.0);
        assert!(report.disciplines.is_empty());
    }

    #[test]
    fn test_class_report() {
        let report = ClassReport::build(
            ClassId::new(),
            "1A".to_string(),
            2,
            3,
            1,
            &[5.0, 10.0],
            &[Present, Present, Present, Absent],
        );
        assert_eq!(report.average_grade, 7.5);
        assert_eq!(report.attendance_percentage, 75.0);
        assert_eq!(report.lesson_count, 3);
    }
}
