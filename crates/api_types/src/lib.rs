//! JSON bodies shared by the HTTP server and its clients.
//!
//! Money travels as signed integer cents in `*_minor` fields. Categories and
//! themes travel as their lowercase tags (`dining-out`, `cyan`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod auth {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Register {
        pub email: String,
        pub password: String,
        pub first_name: String,
        pub last_name: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Registered {
        pub user_id: Uuid,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    /// A bearer token and when it stops being accepted.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SessionView {
        pub token: String,
        pub user_id: Uuid,
        pub expires_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    /// Query string of `GET /transactions`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionQuery {
        pub category: Option<String>,
        /// `true` lists recurring bills only.
        pub recurring: Option<bool>,
    }

    /// Body of both create and full update.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionInput {
        pub name: String,
        /// Positive for income, negative for expenses.
        pub amount_minor: i64,
        pub category: String,
        pub date: NaiveDate,
        #[serde(default)]
        pub recurring: bool,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub category: String,
        pub date: NaiveDate,
        pub recurring: bool,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        pub limit_minor: i64,
        #[serde(default)]
        pub spent_minor: i64,
        pub theme: Option<String>,
        /// Defaults to the current date.
        pub date: Option<NaiveDate>,
    }

    /// Partial update; absent fields keep their stored value.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub category: Option<String>,
        pub limit_minor: Option<i64>,
        pub spent_minor: Option<i64>,
        pub theme: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub limit_minor: i64,
        pub spent_minor: i64,
        /// `limit - spent`, negative when overspent.
        pub remaining_minor: i64,
        pub theme: String,
        pub date: NaiveDate,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod pot {
    use super::*;

    /// Body of both create and full update.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PotInput {
        pub name: String,
        pub goal_minor: i64,
        #[serde(default)]
        pub current_minor: i64,
        pub theme: Option<String>,
    }

    /// Body of deposit and withdraw.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PotMove {
        pub amount_minor: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PotView {
        pub id: Uuid,
        pub name: String,
        pub goal_minor: i64,
        pub current_minor: i64,
        pub remaining_minor: i64,
        pub theme: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PotListResponse {
        pub pots: Vec<PotView>,
    }
}

pub mod overview {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OverviewView {
        pub balance_minor: i64,
        pub income_minor: i64,
        pub expenses_minor: i64,
        pub pots_saved_minor: i64,
        pub pots_goal_minor: i64,
        pub budgets_limit_minor: i64,
        pub budgets_spent_minor: i64,
        pub recurring_bills_minor: i64,
    }
}
