pub mod accounts;
pub mod announcements;
pub mod assessment_types;
pub mod assessments;
pub mod auth;
pub mod classes;
pub mod disciplines;
pub mod finance;
pub mod guardians;
pub mod lessons;
pub mod reports;
pub mod settings;
pub mod staff;
pub mod students;
pub mod teachers;
