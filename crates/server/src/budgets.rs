//! Budgets API endpoints

use api_types::budget::{BudgetListResponse, BudgetNew, BudgetUpdate, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Budget, BudgetCmd, BudgetUpdateCmd, MoneyCents, User};

use crate::{ServerError, parse_id, server::ServerState};

fn view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category: budget.category.to_string(),
        limit_minor: budget.limit.cents(),
        spent_minor: budget.spent.cents(),
        remaining_minor: budget.remaining().cents(),
        theme: budget.theme.to_string(),
        date: budget.date,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets(user.id)
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(user.id, parse_id(&id)?).await?;
    Ok(Json(view(budget)))
}

/// Handle requests for creating a budget; categories are unique per user
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let mut cmd = BudgetCmd::new(payload.category, MoneyCents::new(payload.limit_minor))
        .spent(MoneyCents::new(payload.spent_minor));
    if let Some(theme) = payload.theme {
        cmd = cmd.theme(theme);
    }
    if let Some(date) = payload.date {
        cmd = cmd.date(date);
    }

    let budget = state.engine.create_budget(user.id, cmd).await?;
    Ok((StatusCode::CREATED, Json(view(budget))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let cmd = BudgetUpdateCmd {
        category: payload.category,
        limit: payload.limit_minor.map(MoneyCents::new),
        spent: payload.spent_minor.map(MoneyCents::new),
        theme: payload.theme,
    };
    let budget = state
        .engine
        .update_budget(user.id, parse_id(&id)?, cmd)
        .await?;
    Ok(Json(view(budget)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(user.id, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
