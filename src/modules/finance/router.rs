use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_payable, create_receivable, get_payable, get_payables, get_receivable,
    get_receivables, get_summary, settle_payable, settle_receivable, update_payable,
    update_receivable,
};
use crate::state::AppState;

/// Finance routes. The caller wraps these in the director-only route layer.
pub fn init_finance_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/payables", post(create_payable).get(get_payables))
        .route("/payables/{id}", get(get_payable).put(update_payable))
        .route("/payables/{id}/settle", post(settle_payable))
        .route("/receivables", post(create_receivable).get(get_receivables))
        .route("/receivables/{id}", get(get_receivable).put(update_receivable))
        .route("/receivables/{id}/settle", post(settle_receivable))
}
