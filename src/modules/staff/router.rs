use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_staff, get_staff, get_staff_members, update_staff};
use crate::state::AppState;

pub fn init_staff_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_staff).get(get_staff_members))
        .route("/{id}", get(get_staff).put(update_staff))
}
