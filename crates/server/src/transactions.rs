//! Transactions API endpoints

use api_types::transaction::{
    TransactionInput, TransactionListResponse, TransactionQuery, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Category, MoneyCents, Transaction, TransactionCmd, TransactionListFilter, User};

use crate::{ServerError, parse_id, server::ServerState};

fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        name: tx.name,
        amount_minor: tx.amount.cents(),
        category: tx.category.to_string(),
        date: tx.date,
        recurring: tx.recurring,
    }
}

fn cmd(input: TransactionInput) -> TransactionCmd {
    TransactionCmd::new(
        input.name,
        MoneyCents::new(input.amount_minor),
        input.category,
        input.date,
    )
    .recurring(input.recurring)
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let mut filter = TransactionListFilter::default();
    if let Some(category) = query.category.as_deref() {
        filter = filter.category(Category::try_from(category)?);
    }
    if let Some(recurring) = query.recurring {
        filter = filter.recurring(recurring);
    }

    let transactions = state
        .engine
        .list_transactions(user.id, &filter)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(user.id, parse_id(&id)?).await?;
    Ok(Json(view(tx)))
}

/// Handle requests for recording a new transaction
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionInput>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(user.id, cmd(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionInput>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(user.id, parse_id(&id)?, cmd(payload))
        .await?;
    Ok(Json(view(tx)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(user.id, parse_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
