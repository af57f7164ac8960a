use axum::{Router, routing::get};

use super::controller::{get_class_report, get_student_report};
use crate::state::AppState;

pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/students/{id}", get(get_student_report))
        .route("/classes/{id}", get(get_class_report))
}
