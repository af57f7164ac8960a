use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_guardian, delete_guardian, get_guardian, get_guardians, update_guardian,
};
use crate::state::AppState;

pub fn init_guardians_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_guardian).get(get_guardians))
        .route(
            "/{id}",
            get(get_guardian).put(update_guardian).delete(delete_guardian),
        )
}
