//! # SisProf Models
//!
//! Domain models and DTOs for the SisProf API.
//!
//! Entities derive `sqlx::FromRow` so the Postgres store can load them
//! directly; relation columns (`class_ids`, `discipline_ids`, ...) are built
//! with `ARRAY(SELECT ...)` in the queries. Request DTOs derive
//! `validator::Validate`.
//!
//! # Modules
//!
//! - [`identity`]: login identities, username provisioning, login DTOs
//! - [`disciplines`], [`classes`]: the school structure
//! - [`teachers`], [`students`], [`staff`], [`guardians`]: person records
//! - [`lessons`]: lessons and attendance
//! - [`assessments`]: assessment types, assessments and grades
//! - [`announcements`]: announcements and audience targeting
//! - [`finance`]: payables, receivables and the ledger summary
//! - [`reports`]: per-student and per-class statistics
//! - [`settings`]: school name and current school year
//! - [`roster`]: checking submissions against class rosters
//! - [`ids`], [`value_types`]: typed IDs and validated primitives

#[macro_use]
mod macros;

pub mod announcements;
pub mod assessments;
pub mod classes;
pub mod disciplines;
pub mod finance;
pub mod guardians;
pub mod identity;
pub mod ids;
pub mod lessons;
pub mod people;
pub mod reports;
pub mod roster;
pub mod settings;
pub mod staff;
pub mod students;
pub mod teachers;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use announcements::{Announcement, AnnouncementKind, Membership, Viewer};
pub use assessments::{Assessment, AssessmentType, Grade, GradeEntry};
pub use classes::Class;
pub use disciplines::Discipline;
pub use finance::{LedgerSummary, Payable, PayableCategory, Receivable};
pub use guardians::Guardian;
pub use identity::{AccountRequest, NewAccount, ProvisionedCredentials, UserAccount};
pub use lessons::{Attendance, AttendanceEntry, AttendanceStatus, Lesson};
pub use people::NotificationPreference;
pub use reports::{AttendanceTally, ClassReport, StudentReport};
pub use settings::SchoolSettings;
pub use staff::{Staff, StaffPosition};
pub use students::Student;
pub use teachers::Teacher;
pub use value_types::Email;
