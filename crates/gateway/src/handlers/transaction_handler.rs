//! Ledger handlers. Finance admins only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{
    FinancialSummary, NewTransaction, Role, Transaction, TransactionCategory, TransactionChanges,
    TransactionFilter, TransactionType,
};

use super::patterns::CURRENCY_CODE;
use crate::extractors::ValidatedJson;
use crate::middleware::{AccessPolicy, ChoirContext, Guarded};
use crate::state::AppState;

const TREASURERS: AccessPolicy = AccessPolicy::roles(&[Role::FinanceAdmin]);

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    #[schema(value_type = String, example = "15000.00")]
    pub amount: Decimal,
    /// Defaults to RWF
    #[validate(regex(path = *CURRENCY_CODE, message = "Currency must be a three letter code"))]
    #[schema(example = "RWF")]
    pub currency: Option<String>,
    pub description: Option<String>,
    pub contributor_id: Option<i32>,
    pub transaction_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<TransactionCategory>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    #[validate(regex(path = *CURRENCY_CODE, message = "Currency must be a three letter code"))]
    pub currency: Option<String>,
    pub description: Option<String>,
    pub contributor_id: Option<i32>,
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<TransactionCategory>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl From<TransactionQuery> for TransactionFilter {
    fn from(query: TransactionQuery) -> Self {
        Self {
            transaction_type: query.transaction_type,
            category: query.category,
            from: query.from,
            to: query.to,
        }
    }
}

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/summary", get(summary))
        .route(
            "/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .guarded(TREASURERS)
}

#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(TransactionQuery),
    responses(
        (status = 200, description = "Ledger entries, newest first", body = Vec<Transaction>),
        (status = 403, description = "Finance admin only")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<Vec<Transaction>>> {
    Ok(Json(
        state
            .services
            .transactions()
            .list_transactions(ctx.scope, query.into())
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/transactions/summary",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(TransactionQuery),
    responses(
        (status = 200, description = "Income, expense and balance per currency", body = FinancialSummary),
        (status = 400, description = "Range ends before it starts")
    )
)]
pub async fn summary(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<FinancialSummary>> {
    Ok(Json(
        state
            .services
            .transactions()
            .summary(ctx.scope, query.into())
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Ledger entry", body = Transaction),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<Json<Transaction>> {
    Ok(Json(
        state
            .services
            .transactions()
            .get_transaction(ctx.scope, id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Finance",
    security(("bearer_auth" = [])),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Ledger entry recorded", body = Transaction),
        (status = 400, description = "Amount must be positive")
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    ctx: ChoirContext,
    ValidatedJson(payload): ValidatedJson<CreateTransactionRequest>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let transaction = NewTransaction {
        choir_id: None,
        transaction_type: payload.transaction_type,
        category: payload.category,
        amount: payload.amount,
        currency: payload.currency.unwrap_or_default(),
        description: payload.description,
        contributor_id: payload.contributor_id,
        transaction_date: payload.transaction_date,
    };
    let created = state
        .services
        .transactions()
        .create_transaction(ctx.scope, transaction)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/transactions/{id}",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transaction ID")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Ledger entry updated", body = Transaction),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateTransactionRequest>,
) -> AppResult<Json<Transaction>> {
    let changes = TransactionChanges {
        transaction_type: payload.transaction_type,
        category: payload.category,
        amount: payload.amount,
        currency: payload.currency,
        description: payload.description,
        contributor_id: payload.contributor_id,
        transaction_date: payload.transaction_date,
    };
    Ok(Json(
        state
            .services
            .transactions()
            .update_transaction(ctx.scope, id, changes)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Ledger entry deleted"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    ctx: ChoirContext,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .services
        .transactions()
        .delete_transaction(ctx.scope, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
