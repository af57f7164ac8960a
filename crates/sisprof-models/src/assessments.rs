//! Assessment types, assessments and grades.
//!
//! A grade is unique per (assessment, student); recording it again replaces
//! value and note. The accepted value range is decided by the configured
//! grade bound, not here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sisprof_core::serde::empty_string_as_none;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{
    AssessmentId, AssessmentTypeId, ClassId, DisciplineId, GradeId, StudentId, TeacherId,
};

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const DEFAULT_MAX_VALUE: f64 = 10.0;

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn default_max_value() -> f64 {
    DEFAULT_MAX_VALUE
}

/// Kind of assessment ("Prova", "Trabalho", ...) and its weight.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssessmentType {
    pub id: AssessmentTypeId,
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssessmentTypeDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default = "default_weight")]
    #[validate(range(exclusive_min = 0.0, max = 999.99))]
    pub weight: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAssessmentTypeDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 999.99))]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assessment {
    pub id: AssessmentId,
    pub class_id: ClassId,
    pub discipline_id: DisciplineId,
    pub teacher_id: TeacherId,
    pub assessment_type_id: AssessmentTypeId,
    pub name: String,
    pub date: NaiveDate,
    pub max_value: f64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssessmentDto {
    pub class_id: ClassId,
    pub discipline_id: DisciplineId,
    /// Required for directors; teachers always create assessments for themselves.
    pub teacher_id: Option<TeacherId>,
    pub assessment_type_id: AssessmentTypeId,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default = "default_max_value")]
    #[validate(range(exclusive_min = 0.0, max = 999.99))]
    pub max_value: f64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAssessmentDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(range(exclusive_min = 0.0, max = 999.99))]
    pub max_value: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssessmentFilterParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<ClassId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub discipline_id: Option<DisciplineId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub teacher_id: Option<TeacherId>,
}

impl AssessmentFilterParams {
    pub fn matches(&self, assessment: &Assessment) -> bool {
        self.class_id.is_none_or(|id| assessment.class_id == id)
            && self
                .discipline_id
                .is_none_or(|id| assessment.discipline_id == id)
            && self.teacher_id.is_none_or(|id| assessment.teacher_id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub assessment_id: AssessmentId,
    pub student_id: StudentId,
    pub value: f64,
    pub note: Option<String>,
}

/// One student's line in a grade submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GradeEntry {
    pub student_id: StudentId,
    pub value: f64,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordGradesDto {
    #[validate(length(min = 1), nested)]
    pub entries: Vec<GradeEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeSheetRow {
    pub student_id: StudentId,
    pub student_name: String,
    pub value: Option<f64>,
    pub note: Option<String>,
}

/// Every roster student of an assessment with their recorded grade, if any.
#[derive(Debug, Serialize, ToSchema)]
pub struct GradeSheet {
    pub assessment: Assessment,
    pub rows: Vec<GradeSheetRow>,
}
