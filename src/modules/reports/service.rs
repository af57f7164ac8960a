use std::collections::{BTreeMap, HashMap};

use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::ids::{AssessmentId, ClassId, DisciplineId, StudentId};
use sisprof_models::{AttendanceStatus, ClassReport, StudentReport};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::classes::service::ClassService;
use crate::modules::students::service::StudentService;

pub struct ReportService;

impl ReportService {
    /// Overall and per-discipline grade averages plus attendance for one
    /// student. Students may only request their own report.
    #[instrument(skip(store))]
    pub async fn student_report(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: StudentId,
    ) -> Result<StudentReport, AppError> {
        StudentService::ensure_can_view(store, auth_user, id).await?;
        let student = StudentService::get_student(store, id).await?;

        let disciplines_by_assessment: HashMap<AssessmentId, DisciplineId> = store
            .list_assessments()
            .await?
            .into_iter()
            .map(|assessment| (assessment.id, assessment.discipline_id))
            .collect();

        let grades: Vec<(DisciplineId, f64)> = store
            .list_grades_for_student(id)
            .await?
            .into_iter()
            .filter_map(|grade| {
                disciplines_by_assessment
                    .get(&grade.assessment_id)
                    .map(|discipline_id| (*discipline_id, grade.value))
            })
            .collect();

        let statuses: Vec<AttendanceStatus> = store
            .list_attendance_for_student(id)
            .await?
            .into_iter()
            .map(|record| record.status)
            .collect();

        let discipline_names: BTreeMap<DisciplineId, String> = store
            .list_disciplines()
            .await?
            .into_iter()
            .map(|discipline| (discipline.id, discipline.name))
            .collect();

        Ok(StudentReport::build(
            student.id,
            student.name,
            &grades,
            &statuses,
            &discipline_names,
        ))
    }

    #[instrument(skip(store))]
    pub async fn class_report(store: &dyn Store, id: ClassId) -> Result<ClassReport, AppError> {
        let class = ClassService::get_class(store, id).await?;
        let student_count = store.list_students_in_class(id).await?.len();

        let lesson_count = store
            .list_lessons()
            .await?
            .iter()
            .filter(|lesson| lesson.class_id == id)
            .count();
        let assessment_count = store
            .list_assessments()
            .await?
            .iter()
            .filter(|assessment| assessment.class_id == id)
            .count();

        let grade_values: Vec<f64> = store
            .list_grades_for_class(id)
            .await?
            .into_iter()
            .map(|grade| grade.value)
            .collect();
        let statuses: Vec<AttendanceStatus> = store
            .list_attendance_for_class(id)
            .await?
            .into_iter()
            .map(|record| record.status)
            .collect();

        Ok(ClassReport::build(
            class.id,
            class.name,
            student_count,
            lesson_count,
            assessment_count,
            &grade_values,
            &statuses,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sisprof_db::AcademicStore;
    use sisprof_models::ids::{AssessmentTypeId, LessonId};
    use sisprof_models::{Assessment, AssessmentType, AttendanceEntry, GradeEntry, Lesson};

    use crate::utils::fixtures::{School, school};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    async fn record_lesson(school: &School, d: u32, status: AttendanceStatus) {
        let lesson = Lesson {
            id: LessonId::new(),
            class_id: school.class_1a,
            discipline_id: school.math,
            teacher_id: school.maria,
            date: day(d),
            content: None,
        };
        school.store.insert_lesson(&lesson).await.unwrap();
        school
            .store
            .upsert_attendance(
                lesson.id,
                &[AttendanceEntry {
                    student_id: school.ana,
                    status,
                    note: None,
                }],
            )
            .await
            .unwrap();
    }

    async fn record_grade(school: &School, value: f64) {
        let assessment_type = AssessmentType {
            id: AssessmentTypeId::new(),
            name: "Prova".to_string(),
            weight: 1.0,
        };
        school
            .store
            .insert_assessment_type(&assessment_type)
            .await
            .unwrap();

        let assessment = Assessment {
            id: AssessmentId::new(),
            class_id: school.class_1a,
            discipline_id: school.math,
            teacher_id: school.maria,
            assessment_type_id: assessment_type.id,
            name: "P1".to_string(),
            date: day(20),
            max_value: 10.0,
            description: None,
        };
        school.store.insert_assessment(&assessment).await.unwrap();
        school
            .store
            .upsert_grades(
                assessment.id,
                &[GradeEntry {
                    student_id: school.ana,
                    value,
                    note: None,
                }],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_full_attendance_is_one_hundred_percent() {
        let school = school().await;
        record_lesson(&school, 4, AttendanceStatus::Present).await;
        record_lesson(&school, 5, AttendanceStatus::Present).await;

        let report = ReportService::student_report(&school.store, &school.ana_login, school.ana)
            .await
            .unwrap();
        assert_eq!(report.attendance.total(), 2);
        assert_eq!(report.attendance_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_report_without_records_is_zero() {
        let school = school().await;
        let report =
            ReportService::student_report(&school.store, &school.director_login, school.bruno)
                .await
                .unwrap();
        assert_eq!(report.average_grade, 0.0);
        assert_eq!(report.attendance_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_grades_are_grouped_by_discipline() {
        let school = school().await;
        record_grade(&school, 6.0).await;
        record_grade(&school, 9.0).await;

        let report = ReportService::student_report(&school.store, &school.maria_login, school.ana)
            .await
            .unwrap();
        assert_eq!(report.grades_count, 2);
        assert_eq!(report.average_grade, 7.5);
        assert_eq!(report.disciplines.len(), 1);
        assert_eq!(report.disciplines[0].discipline_id, school.math);
    }

    #[tokio::test]
    async fn test_student_cannot_read_another_report() {
        let school = school().await;
        let err = ReportService::student_report(&school.store, &school.bruno_login, school.ana)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[tokio::test]
    async fn test_class_report_counts() {
        let school = school().await;
        record_lesson(&school, 4, AttendanceStatus::Present).await;
        record_lesson(&school, 5, AttendanceStatus::Absent).await;
        record_grade(&school, 8.0).await;

        let report = ReportService::class_report(&school.store, school.class_1a)
            .await
            .unwrap();
        assert_eq!(report.student_count, 1);
        assert_eq!(report.lesson_count, 2);
        assert_eq!(report.assessment_count, 1);
        assert_eq!(report.average_grade, 8.0);
        assert_eq!(report.attendance_percentage, 50.0);
    }

    #[tokio::test]
    async fn test_unknown_class_is_not_found() {
        let school = school().await;
        let err = ReportService::class_report(&school.store, ClassId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
