use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_lesson, get_attendance, get_lesson, get_lessons, record_attendance, update_lesson,
};
use crate::state::AppState;

pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lesson).get(get_lessons))
        .route("/{id}", get(get_lesson).put(update_lesson))
        .route("/{id}/attendance", get(get_attendance).put(record_attendance))
}
