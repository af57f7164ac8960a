//! Assessments and their grades.
//!
//! Grades follow the same ownership and roster rules as attendance. Each
//! value is also checked against the configured grade bound.

use std::collections::HashMap;

use anyhow::anyhow;
use sisprof_config::AcademicConfig;
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::assessments::{
    AssessmentFilterParams, CreateAssessmentDto, GradeSheet, GradeSheetRow, RecordGradesDto,
    UpdateAssessmentDto,
};
use sisprof_models::ids::AssessmentId;
use sisprof_models::roster::check_against_roster;
use sisprof_models::{Assessment, Grade};
use sisprof_observability::track_grades_recorded;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::classes::service::ClassService;
use crate::utils::auth_helpers::{
    ensure_director_or_owner, ensure_owner, require_teacher_record, resolve_owning_teacher,
};

pub struct AssessmentService;

impl AssessmentService {
    #[instrument(skip(store))]
    pub async fn create_assessment(
        store: &dyn Store,
        auth_user: &AuthUser,
        dto: CreateAssessmentDto,
    ) -> Result<Assessment, AppError> {
        let teacher_id = resolve_owning_teacher(store, auth_user, dto.teacher_id).await?;
        ClassService::ensure_exist(store, &[dto.class_id], "class_id").await?;
        if store.get_discipline(dto.discipline_id).await?.is_none() {
            return Err(AppError::invalid_field(
                "discipline_id",
                format!("discipline {} does not exist", dto.discipline_id),
            ));
        }
        if store.get_assessment_type(dto.assessment_type_id).await?.is_none() {
            return Err(AppError::invalid_field(
                "assessment_type_id",
                format!("assessment type {} does not exist", dto.assessment_type_id),
            ));
        }

        let assessment = Assessment {
            id: AssessmentId::new(),
            class_id: dto.class_id,
            discipline_id: dto.discipline_id,
            teacher_id,
            assessment_type_id: dto.assessment_type_id,
            name: dto.name,
            date: dto.date,
            max_value: dto.max_value,
            description: dto.description,
        };
        store.insert_assessment(&assessment).await?;

        Ok(assessment)
    }

    #[instrument(skip(store))]
    pub async fn get_assessments(
        store: &dyn Store,
        auth_user: &AuthUser,
        mut filters: AssessmentFilterParams,
    ) -> Result<Vec<Assessment>, AppError> {
        if !auth_user.is_director() {
            filters.teacher_id = Some(require_teacher_record(store, auth_user).await?.id);
        }

        Ok(store
            .list_assessments()
            .await?
            .into_iter()
            .filter(|assessment| filters.matches(assessment))
            .collect())
    }

    #[instrument(skip(store))]
    pub async fn get_assessment(store: &dyn Store, id: AssessmentId) -> Result<Assessment, AppError> {
        store
            .get_assessment(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Assessment not found")))
    }

    #[instrument(skip(store))]
    pub async fn get_assessment_for(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: AssessmentId,
    ) -> Result<Assessment, AppError> {
        let assessment = Self::get_assessment(store, id).await?;
        ensure_director_or_owner(store, auth_user, assessment.teacher_id).await?;
        Ok(assessment)
    }

    #[instrument(skip(store, config))]
    pub async fn update_assessment(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: AssessmentId,
        dto: UpdateAssessmentDto,
        config: &AcademicConfig,
    ) -> Result<Assessment, AppError> {
        let mut assessment = Self::get_assessment_for(store, auth_user, id).await?;

        // Recorded grades must still fit under a changed maximum.
        if let Some(max_value) = dto.max_value.filter(|max| *max != assessment.max_value) {
            let recorded = store.list_grades_for_assessment(assessment.id).await?;
            if let Some(grade) = recorded
                .iter()
                .find(|grade| !config.grade_bound.accepts(grade.value, max_value))
            {
                return Err(AppError::invalid_field(
                    "max_value",
                    format!(
                        "student {} already has grade {}, above the new maximum {}",
                        grade.student_id, grade.value, max_value
                    ),
                ));
            }
        }

        if let Some(name) = dto.name {
            assessment.name = name;
        }
        if let Some(date) = dto.date {
            assessment.date = date;
        }
        if let Some(max_value) = dto.max_value {
            assessment.max_value = max_value;
        }
        if dto.description.is_some() {
            assessment.description = dto.description;
        }

        store.update_assessment(&assessment).await?;
        Ok(assessment)
    }

    #[instrument(skip(store))]
    pub async fn get_grade_sheet(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: AssessmentId,
    ) -> Result<GradeSheet, AppError> {
        let assessment = Self::get_assessment_for(store, auth_user, id).await?;
        let roster = store.list_students_in_class(assessment.class_id).await?;
        let mut recorded: HashMap<_, Grade> = store
            .list_grades_for_assessment(assessment.id)
            .await?
            .into_iter()
            .map(|grade| (grade.student_id, grade))
            .collect();

        let rows = roster
            .into_iter()
            .map(|student| {
                let grade = recorded.remove(&student.id);
                GradeSheetRow {
                    student_id: student.id,
                    student_name: student.name,
                    value: grade.as_ref().map(|g| g.value),
                    note: grade.and_then(|g| g.note),
                }
            })
            .collect();

        Ok(GradeSheet { assessment, rows })
    }

    #[instrument(skip(store, dto, config), fields(entries = dto.entries.len()))]
    pub async fn record_grades(
        store: &dyn Store,
        auth_user: &AuthUser,
        id: AssessmentId,
        dto: RecordGradesDto,
        config: &AcademicConfig,
    ) -> Result<Vec<Grade>, AppError> {
        let assessment = Self::get_assessment(store, id).await?;
        ensure_owner(store, auth_user, assessment.teacher_id).await?;

        if let Some(entry) = dto
            .entries
            .iter()
            .find(|entry| !config.grade_bound.accepts(entry.value, assessment.max_value))
        {
            return Err(AppError::invalid_field(
                "entries",
                format!(
                    "grade {} for student {} must be between 0 and {}",
                    entry.value,
                    entry.student_id,
                    config.grade_bound.upper_limit(assessment.max_value)
                ),
            ));
        }

        let roster: Vec<_> = store
            .list_students_in_class(assessment.class_id)
            .await?
            .into_iter()
            .map(|student| student.id)
            .collect();
        check_against_roster(dto.entries.iter().map(|e| e.student_id), &roster)
            .map_err(|violation| AppError::invalid_field("entries", violation.to_string()))?;

        let recorded = store.upsert_grades(assessment.id, &dto.entries).await?;
        track_grades_recorded(recorded.len());
        tracing::info!(assessment_id = %assessment.id, count = recorded.len(), "grades recorded");

        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sisprof_config::GradeBound;
    use sisprof_db::AcademicStore;
    use sisprof_models::AssessmentType;
    use sisprof_models::assessments::GradeEntry;
    use sisprof_models::ids::{AssessmentTypeId, StudentId};

    use crate::utils::fixtures::{School, school};

    async fn prova(school: &School, max_value: f64) -> Assessment {
        let assessment_type = AssessmentType {
            id: AssessmentTypeId::new(),
            name: "Prova".to_string(),
            weight: 1.0,
        };
        school.store.insert_assessment_type(&assessment_type).await.unwrap();

        AssessmentService::create_assessment(
            &school.store,
            &school.maria_login,
            CreateAssessmentDto {
                class_id: school.class_1a,
                discipline_id: school.math,
                teacher_id: None,
                assessment_type_id: assessment_type.id,
                name: "Prova 1".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
                max_value,
                description: None,
            },
        )
        .await
        .unwrap()
    }

    fn grades(student_id: StudentId, value: f64) -> RecordGradesDto {
        RecordGradesDto {
            entries: vec![GradeEntry {
                student_id,
                value,
                note: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_regrading_keeps_one_row_with_latest_value() {
        let school = school().await;
        let assessment = prova(&school, 10.0).await;
        let config = AcademicConfig::default();

        for value in [7.5, 9.0] {
            AssessmentService::record_grades(
                &school.store,
                &school.maria_login,
                assessment.id,
                grades(school.ana, value),
                &config,
            )
            .await
            .unwrap();
        }

        let stored = school.store.list_grades_for_assessment(assessment.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, 9.0);
    }

    #[tokio::test]
    async fn test_grade_above_assessment_max_is_rejected() {
        let school = school().await;
        let assessment = prova(&school, 5.0).await;

        let err = AssessmentService::record_grades(
            &school.store,
            &school.maria_login,
            assessment.id,
            grades(school.ana, 7.0),
            &AcademicConfig::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status.as_u16(), 422);
        assert!(school.store.list_grades_for_assessment(assessment.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fixed_scale_bound() {
        let school = school().await;
        let assessment = prova(&school, 20.0).await;
        let config = AcademicConfig {
            grade_bound: GradeBound::FixedScale,
        };

        let err = AssessmentService::record_grades(
            &school.store,
            &school.maria_login,
            assessment.id,
            grades(school.ana, 15.0),
            &config,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);

        assert!(AssessmentService::record_grades(
            &school.store,
            &school.maria_login,
            assessment.id,
            grades(school.ana, 10.0),
            &config,
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_other_teacher_cannot_grade() {
        let school = school().await;
        let assessment = prova(&school, 10.0).await;

        let err = AssessmentService::record_grades(
            &school.store,
            &school.pedro_login,
            assessment.id,
            grades(school.ana, 8.0),
            &AcademicConfig::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status.as_u16(), 403);
        assert!(school.store.list_grades_for_assessment(assessment.id).await.unwrap().is_empty());
    }

    fn new_max(max_value: f64) -> UpdateAssessmentDto {
        UpdateAssessmentDto {
            name: None,
            date: None,
            max_value: Some(max_value),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_lowering_max_below_recorded_grade_is_rejected() {
        let school = school().await;
        let assessment = prova(&school, 10.0).await;
        let config = AcademicConfig::default();
        AssessmentService::record_grades(
            &school.store,
            &school.maria_login,
            assessment.id,
            grades(school.ana, 9.0),
            &config,
        )
        .await
        .unwrap();

        let err = AssessmentService::update_assessment(
            &school.store,
            &school.maria_login,
            assessment.id,
            new_max(5.0),
            &config,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status.as_u16(), 422);
        assert!(err.fields.unwrap().contains_key("max_value"));
        let stored = AssessmentService::get_assessment(&school.store, assessment.id).await.unwrap();
        assert_eq!(stored.max_value, 10.0);
    }

    #[tokio::test]
    async fn test_max_can_change_while_grades_still_fit() {
        let school = school().await;
        let assessment = prova(&school, 10.0).await;
        let config = AcademicConfig::default();
        AssessmentService::record_grades(
            &school.store,
            &school.maria_login,
            assessment.id,
            grades(school.ana, 4.0),
            &config,
        )
        .await
        .unwrap();

        let updated = AssessmentService::update_assessment(
            &school.store,
            &school.maria_login,
            assessment.id,
            new_max(5.0),
            &config,
        )
        .await
        .unwrap();
        assert_eq!(updated.max_value, 5.0);
    }

    #[tokio::test]
    async fn test_fixed_scale_ignores_lowered_max() {
        let school = school().await;
        let assessment = prova(&school, 10.0).await;
        let config = AcademicConfig {
            grade_bound: GradeBound::FixedScale,
        };
        AssessmentService::record_grades(
            &school.store,
            &school.maria_login,
            assessment.id,
            grades(school.ana, 9.0),
            &config,
        )
        .await
        .unwrap();

        let updated = AssessmentService::update_assessment(
            &school.store,
            &school.maria_login,
            assessment.id,
            new_max(5.0),
            &config,
        )
        .await
        .unwrap();
        assert_eq!(updated.max_value, 5.0);
    }

    #[tokio::test]
    async fn test_other_teacher_cannot_read_sheet() {
        let school = school().await;
        let assessment = prova(&school, 10.0).await;

        let err = AssessmentService::get_grade_sheet(&school.store, &school.pedro_login, assessment.id)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 403);

        let sheet = AssessmentService::get_grade_sheet(&school.store, &school.director_login, assessment.id)
            .await
            .unwrap();
        assert_eq!(sheet.rows.len(), 1);
    }
}
