//! Overview API endpoint

use api_types::overview::OverviewView;
use axum::{Extension, Json, extract::State};
use engine::User;

use crate::{ServerError, server::ServerState};

/// Handle requests for the user's dashboard totals
pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<OverviewView>, ServerError> {
    let overview = state.engine.overview(user.id).await?;

    Ok(Json(OverviewView {
        balance_minor: overview.balance.cents(),
        income_minor: overview.income.cents(),
        expenses_minor: overview.expenses.cents(),
        pots_saved_minor: overview.pots_saved.cents(),
        pots_goal_minor: overview.pots_goal.cents(),
        budgets_limit_minor: overview.budgets_limit.cents(),
        budgets_spent_minor: overview.budgets_spent.cents(),
        recurring_bills_minor: overview.recurring_bills.cents(),
    }))
}
