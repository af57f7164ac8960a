use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_discipline, get_discipline, get_disciplines, update_discipline};
use crate::state::AppState;

pub fn init_disciplines_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_discipline).get(get_disciplines))
        .route("/{id}", get(get_discipline).put(update_discipline))
}
