use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_class, get_class, get_class_students, get_classes, update_class};
use crate::state::AppState;

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class).get(get_classes))
        .route("/{id}", get(get_class).put(update_class))
        .route("/{id}/students", get(get_class_students))
}
