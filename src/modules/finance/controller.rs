use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sisprof_core::AppError;
use sisprof_models::finance::{
    CreatePayableDto, CreateReceivableDto, LedgerFilterParams, SettleDto, UpdatePayableDto,
    UpdateReceivableDto,
};
use sisprof_models::ids::{PayableId, ReceivableId};
use sisprof_models::{LedgerSummary, Payable, Receivable};
use tracing::instrument;

use super::service::FinanceService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

// Every route here sits behind the director-only route layer.

#[utoipa::path(
    post,
    path = "/api/finance/payables",
    request_body = CreatePayableDto,
    responses(
        (status = 201, description = "Payable created", body = Payable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 422, description = "Validation error")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_payable(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreatePayableDto>,
) -> Result<(StatusCode, Json<Payable>), AppError> {
    let payable = FinanceService::create_payable(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(payable)))
}

#[utoipa::path(
    get,
    path = "/api/finance/payables",
    params(LedgerFilterParams),
    responses(
        (status = 200, description = "Payables ordered by due date", body = Vec<Payable>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_payables(
    State(state): State<AppState>,
    Query(filters): Query<LedgerFilterParams>,
) -> Result<Json<Vec<Payable>>, AppError> {
    let payables = FinanceService::get_payables(state.store.as_ref(), filters).await?;
    Ok(Json(payables))
}

#[utoipa::path(
    get,
    path = "/api/finance/payables/{id}",
    params(("id" = PayableId, Path, description = "Payable ID")),
    responses(
        (status = 200, description = "Payable", body = Payable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Payable not found")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_payable(
    State(state): State<AppState>,
    Path(id): Path<PayableId>,
) -> Result<Json<Payable>, AppError> {
    let payable = FinanceService::get_payable(state.store.as_ref(), id).await?;
    Ok(Json(payable))
}

#[utoipa::path(
    put,
    path = "/api/finance/payables/{id}",
    params(("id" = PayableId, Path, description = "Payable ID")),
    request_body = UpdatePayableDto,
    responses(
        (status = 200, description = "Payable updated", body = Payable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Payable not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_payable(
    State(state): State<AppState>,
    Path(id): Path<PayableId>,
    ValidatedJson(dto): ValidatedJson<UpdatePayableDto>,
) -> Result<Json<Payable>, AppError> {
    let payable = FinanceService::update_payable(state.store.as_ref(), id, dto).await?;
    Ok(Json(payable))
}

/// Settle; the date defaults to today
#[utoipa::path(
    post,
    path = "/api/finance/payables/{id}/settle",
    params(("id" = PayableId, Path, description = "Payable ID")),
    request_body = SettleDto,
    responses(
        (status = 200, description = "Payable settled", body = Payable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Payable not found"),
        (status = 409, description = "Payable already settled")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn settle_payable(
    State(state): State<AppState>,
    Path(id): Path<PayableId>,
    ValidatedJson(dto): ValidatedJson<SettleDto>,
) -> Result<Json<Payable>, AppError> {
    let payable = FinanceService::settle_payable(state.store.as_ref(), id, dto).await?;
    Ok(Json(payable))
}

#[utoipa::path(
    post,
    path = "/api/finance/receivables",
    request_body = CreateReceivableDto,
    responses(
        (status = 201, description = "Receivable created", body = Receivable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 422, description = "Validation error or unknown student")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_receivable(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateReceivableDto>,
) -> Result<(StatusCode, Json<Receivable>), AppError> {
    let receivable = FinanceService::create_receivable(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(receivable)))
}

#[utoipa::path(
    get,
    path = "/api/finance/receivables",
    params(LedgerFilterParams),
    responses(
        (status = 200, description = "Receivables ordered by due date", body = Vec<Receivable>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_receivables(
    State(state): State<AppState>,
    Query(filters): Query<LedgerFilterParams>,
) -> Result<Json<Vec<Receivable>>, AppError> {
    let receivables = FinanceService::get_receivables(state.store.as_ref(), filters).await?;
    Ok(Json(receivables))
}

#[utoipa::path(
    get,
    path = "/api/finance/receivables/{id}",
    params(("id" = ReceivableId, Path, description = "Receivable ID")),
    responses(
        (status = 200, description = "Receivable", body = Receivable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Receivable not found")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_receivable(
    State(state): State<AppState>,
    Path(id): Path<ReceivableId>,
) -> Result<Json<Receivable>, AppError> {
    let receivable = FinanceService::get_receivable(state.store.as_ref(), id).await?;
    Ok(Json(receivable))
}

#[utoipa::path(
    put,
    path = "/api/finance/receivables/{id}",
    params(("id" = ReceivableId, Path, description = "Receivable ID")),
    request_body = UpdateReceivableDto,
    responses(
        (status = 200, description = "Receivable updated", body = Receivable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Receivable not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_receivable(
    State(state): State<AppState>,
    Path(id): Path<ReceivableId>,
    ValidatedJson(dto): ValidatedJson<UpdateReceivableDto>,
) -> Result<Json<Receivable>, AppError> {
    let receivable = FinanceService::update_receivable(state.store.as_ref(), id, dto).await?;
    Ok(Json(receivable))
}

/// Settle; the date defaults to today
#[utoipa::path(
    post,
    path = "/api/finance/receivables/{id}/settle",
    params(("id" = ReceivableId, Path, description = "Receivable ID")),
    request_body = SettleDto,
    responses(
        (status = 200, description = "Receivable settled", body = Receivable),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role"),
        (status = 404, description = "Receivable not found"),
        (status = 409, description = "Receivable already settled")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn settle_receivable(
    State(state): State<AppState>,
    Path(id): Path<ReceivableId>,
    ValidatedJson(dto): ValidatedJson<SettleDto>,
) -> Result<Json<Receivable>, AppError> {
    let receivable = FinanceService::settle_receivable(state.store.as_ref(), id, dto).await?;
    Ok(Json(receivable))
}

#[utoipa::path(
    get,
    path = "/api/finance/summary",
    responses(
        (status = 200, description = "Open and settled totals, overdue counts and the balance", body = LedgerSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the director role")
    ),
    tag = "Finance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<LedgerSummary>, AppError> {
    let summary = FinanceService::get_summary(state.store.as_ref()).await?;
    Ok(Json(summary))
}
