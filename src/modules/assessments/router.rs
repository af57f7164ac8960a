use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_assessment, get_assessment, get_assessments, get_grades, record_grades,
    update_assessment,
};
use crate::state::AppState;

pub fn init_assessments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assessment).get(get_assessments))
        .route("/{id}", get(get_assessment).put(update_assessment))
        .route("/{id}/grades", get(get_grades).put(record_grades))
}
