use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_assessment_type, get_assessment_type, get_assessment_types, update_assessment_type,
};
use crate::state::AppState;

pub fn init_assessment_types_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assessment_type).get(get_assessment_types))
        .route("/{id}", get(get_assessment_type).put(update_assessment_type))
}
