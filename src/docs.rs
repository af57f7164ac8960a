use sisprof_core::{PaginationMeta, Role};
use sisprof_models::announcements::CreateAnnouncementDto;
use sisprof_models::assessments::{
    CreateAssessmentDto, CreateAssessmentTypeDto, GradeSheet, GradeSheetRow, RecordGradesDto,
    UpdateAssessmentDto, UpdateAssessmentTypeDto,
};
use sisprof_models::classes::{CreateClassDto, PaginatedClassesResponse, UpdateClassDto};
use sisprof_models::disciplines::{CreateDisciplineDto, UpdateDisciplineDto};
use sisprof_models::finance::{
    CreatePayableDto, CreateReceivableDto, SettleDto, UpdatePayableDto, UpdateReceivableDto,
};
use sisprof_models::guardians::{CreateGuardianDto, UpdateGuardianDto};
use sisprof_models::identity::{CurrentAccount, LoginRequest, LoginResponse};
use sisprof_models::lessons::{
    AttendanceSheet, AttendanceSheetRow, CreateLessonDto, RecordAttendanceDto, UpdateLessonDto,
};
use sisprof_models::reports::DisciplineAverage;
use sisprof_models::settings::UpdateSettingsDto;
use sisprof_models::staff::{CreateStaffDto, StaffCreatedResponse, UpdateStaffDto};
use sisprof_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, StudentCreatedResponse, UpdateStudentDto,
};
use sisprof_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, TeacherCreatedResponse, UpdateTeacherDto,
};
use sisprof_models::{
    Announcement, AnnouncementKind, Assessment, AssessmentType, Attendance, AttendanceEntry,
    AttendanceStatus, AttendanceTally, Class, ClassReport, Discipline, Email, Grade, GradeEntry,
    Guardian, LedgerSummary, Lesson, NotificationPreference, Payable, PayableCategory,
    ProvisionedCredentials, Receivable, SchoolSettings, Staff, StaffPosition, Student,
    StudentReport, Teacher,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::settings::controller::get_settings,
        crate::modules::settings::controller::update_settings,
        crate::modules::disciplines::controller::create_discipline,
        crate::modules::disciplines::controller::get_disciplines,
        crate::modules::disciplines::controller::get_discipline,
        crate::modules::disciplines::controller::update_discipline,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::get_class_students,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::staff::controller::create_staff,
        crate::modules::staff::controller::get_staff_members,
        crate::modules::staff::controller::get_staff,
        crate::modules::staff::controller::update_staff,
        crate::modules::guardians::controller::create_guardian,
        crate::modules::guardians::controller::get_guardians,
        crate::modules::guardians::controller::get_guardian,
        crate::modules::guardians::controller::update_guardian,
        crate::modules::guardians::controller::delete_guardian,
        crate::modules::assessment_types::controller::create_assessment_type,
        crate::modules::assessment_types::controller::get_assessment_types,
        crate::modules::assessment_types::controller::get_assessment_type,
        crate::modules::assessment_types::controller::update_assessment_type,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::get_lessons,
        crate::modules::lessons::controller::get_lesson,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::get_attendance,
        crate::modules::lessons::controller::record_attendance,
        crate::modules::assessments::controller::create_assessment,
        crate::modules::assessments::controller::get_assessments,
        crate::modules::assessments::controller::get_assessment,
        crate::modules::assessments::controller::update_assessment,
        crate::modules::assessments::controller::get_grades,
        crate::modules::assessments::controller::record_grades,
        crate::modules::announcements::controller::create_announcement,
        crate::modules::announcements::controller::get_announcements,
        crate::modules::announcements::controller::get_announcement,
        crate::modules::announcements::controller::mark_announcement_sent,
        crate::modules::finance::controller::create_payable,
        crate::modules::finance::controller::get_payables,
        crate::modules::finance::controller::get_payable,
        crate::modules::finance::controller::update_payable,
        crate::modules::finance::controller::settle_payable,
        crate::modules::finance::controller::create_receivable,
        crate::modules::finance::controller::get_receivables,
        crate::modules::finance::controller::get_receivable,
        crate::modules::finance::controller::update_receivable,
        crate::modules::finance::controller::settle_receivable,
        crate::modules::finance::controller::get_summary,
        crate::modules::reports::controller::get_student_report,
        crate::modules::reports::controller::get_class_report,
    ),
    components(
        schemas(
            ErrorResponse,
            Role,
            Email,
            PaginationMeta,
            LoginRequest,
            LoginResponse,
            CurrentAccount,
            ProvisionedCredentials,
            SchoolSettings,
            UpdateSettingsDto,
            Discipline,
            CreateDisciplineDto,
            UpdateDisciplineDto,
            Class,
            CreateClassDto,
            UpdateClassDto,
            PaginatedClassesResponse,
            NotificationPreference,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            TeacherCreatedResponse,
            PaginatedTeachersResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            StudentCreatedResponse,
            PaginatedStudentsResponse,
            Staff,
            StaffPosition,
            CreateStaffDto,
            UpdateStaffDto,
            StaffCreatedResponse,
            Guardian,
            CreateGuardianDto,
            UpdateGuardianDto,
            AssessmentType,
            CreateAssessmentTypeDto,
            UpdateAssessmentTypeDto,
            Lesson,
            CreateLessonDto,
            UpdateLessonDto,
            Attendance,
            AttendanceStatus,
            AttendanceEntry,
            RecordAttendanceDto,
            AttendanceSheet,
            AttendanceSheetRow,
            Assessment,
            CreateAssessmentDto,
            UpdateAssessmentDto,
            Grade,
            GradeEntry,
            RecordGradesDto,
            GradeSheet,
            GradeSheetRow,
            Announcement,
            AnnouncementKind,
            CreateAnnouncementDto,
            Payable,
            PayableCategory,
            CreatePayableDto,
            UpdatePayableDto,
            Receivable,
            CreateReceivableDto,
            UpdateReceivableDto,
            SettleDto,
            LedgerSummary,
            AttendanceTally,
            DisciplineAverage,
            StudentReport,
            ClassReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and the current account"),
        (name = "Settings", description = "School name and current school year"),
        (name = "Disciplines", description = "Subjects taught at the school"),
        (name = "Classes", description = "Classes and their rosters"),
        (name = "Teachers", description = "Teacher records and login provisioning"),
        (name = "Students", description = "Student records and login provisioning"),
        (name = "Staff", description = "Non-teaching staff"),
        (name = "Guardians", description = "Student guardians"),
        (name = "Assessment Types", description = "Kinds of assessment and their weights"),
        (name = "Lessons", description = "Lessons and attendance"),
        (name = "Assessments", description = "Assessments and grades"),
        (name = "Announcements", description = "Notices to classes, students and teachers"),
        (name = "Finance", description = "Payables, receivables and the ledger summary"),
        (name = "Reports", description = "Grade and attendance statistics")
    ),
    info(
        title = "SisProf API",
        version = "0.1.0",
        description = "School administration API: academic records, attendance, grades, notices and finance.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
