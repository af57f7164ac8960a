use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_announcement, get_announcement, get_announcements, mark_announcement_sent,
};
use crate::state::AppState;

pub fn init_announcements_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_announcement).get(get_announcements))
        .route("/{id}", get(get_announcement))
        .route("/{id}/sent", post(mark_announcement_sent))
}
