//! Grading rules.
//!
//! `GRADE_BOUND` selects the upper limit a recorded grade is checked against:
//!
//! - `assessment_max` (default): `0 <= value <= assessment.max_value`
//! - `fixed_scale`: `0 <= value <= 10` regardless of the assessment

use std::fmt;
use std::str::FromStr;

use crate::{env_lookup, parse_or};

pub const FIXED_SCALE_MAX: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradeBound {
    #[default]
    AssessmentMax,
    FixedScale,
}

impl GradeBound {
    /// Highest value accepted for an assessment worth `max_value`.
    pub fn upper_limit(&self, max_value: f64) -> f64 {
        match self {
            GradeBound::AssessmentMax => max_value,
            GradeBound::FixedScale => FIXED_SCALE_MAX,
        }
    }

    pub fn accepts(&self, value: f64, max_value: f64) -> bool {
        value.is_finite() && value >= 0.0 && value <= self.upper_limit(max_value)
    }
}

impl FromStr for GradeBound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assessment_max" => Ok(GradeBound::AssessmentMax),
            "fixed_scale" => Ok(GradeBound::FixedScale),
            other => Err(format!("unknown grade bound '{}'", other)),
        }
    }
}

impl fmt::Display for GradeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeBound::AssessmentMax => f.write_str("assessment_max"),
            GradeBound::FixedScale => f.write_str("fixed_scale"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AcademicConfig {
    pub grade_bound: GradeBound,
}

impl AcademicConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            grade_bound: parse_or(&lookup, "GRADE_BOUND", GradeBound::default()),
        }
    }
}
