//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update of
//! transactions, budgets, pots and user registration), keeping call sites
//! readable and avoiding long argument lists. Free-text fields (`category`,
//! `theme`) are parsed by the engine so every entry point shares the same
//! validation.

use chrono::NaiveDate;

use crate::MoneyCents;

/// Create or fully replace a transaction.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub name: String,
    pub amount: MoneyCents,
    pub category: String,
    pub date: NaiveDate,
    pub recurring: bool,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        amount: MoneyCents,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            category: category.into(),
            date,
            recurring: false,
        }
    }

    #[must_use]
    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }
}

/// Create a budget.
#[derive(Clone, Debug)]
pub struct BudgetCmd {
    pub category: String,
    pub limit: MoneyCents,
    pub spent: MoneyCents,
    pub theme: Option<String>,
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

impl BudgetCmd {
    #[must_use]
    pub fn new(category: impl Into<String>, limit: MoneyCents) -> Self {
        Self {
            category: category.into(),
            limit,
            spent: MoneyCents::ZERO,
            theme: None,
            date: None,
        }
    }

    #[must_use]
    pub fn spent(mut self, spent: MoneyCents) -> Self {
        self.spent = spent;
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Partial update of a budget. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct BudgetUpdateCmd {
    pub category: Option<String>,
    pub limit: Option<MoneyCents>,
    pub spent: Option<MoneyCents>,
    pub theme: Option<String>,
}

impl BudgetUpdateCmd {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.limit.is_none() && self.spent.is_none() && self.theme.is_none()
    }
}

/// Create or fully replace a pot.
#[derive(Clone, Debug)]
pub struct PotCmd {
    pub name: String,
    pub goal: MoneyCents,
    pub current: MoneyCents,
    pub theme: Option<String>,
}

impl PotCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, goal: MoneyCents) -> Self {
        Self {
            name: name.into(),
            goal,
            current: MoneyCents::ZERO,
            theme: None,
        }
    }

    #[must_use]
    pub fn current(mut self, current: MoneyCents) -> Self {
        self.current = current;
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// Register a new account.
#[derive(Clone, Debug)]
pub struct RegisterCmd {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}
