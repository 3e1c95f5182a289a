use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, transactions};

use super::{Engine, with_tx};

/// Totals shown on the overview page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Sum of every transaction amount.
    pub balance: MoneyCents,
    pub income: MoneyCents,
    /// Absolute value of the outgoing transactions.
    pub expenses: MoneyCents,
    pub pots_saved: MoneyCents,
    pub pots_goal: MoneyCents,
    pub budgets_limit: MoneyCents,
    pub budgets_spent: MoneyCents,
    /// Absolute value of the outgoing recurring transactions.
    pub recurring_bills: MoneyCents,
}

pub(super) fn totals_overflow() -> EngineError {
    EngineError::InvalidAmount("totals exceed the supported amount range".to_string())
}

fn add(total: MoneyCents, amount: MoneyCents) -> ResultEngine<MoneyCents> {
    total.checked_add(amount).ok_or_else(totals_overflow)
}

impl Overview {
    fn add_transaction(&mut self, amount: MoneyCents, recurring: bool) -> ResultEngine<()> {
        self.balance = add(self.balance, amount)?;
        if amount.is_positive() {
            self.income = add(self.income, amount)?;
        } else if amount.is_negative() {
            let outgoing = amount.checked_abs().ok_or_else(totals_overflow)?;
            self.expenses = add(self.expenses, outgoing)?;
            if recurring {
                self.recurring_bills = add(self.recurring_bills, outgoing)?;
            }
        }
        Ok(())
    }
}

impl Engine {
    /// Computes the overview totals for a user.
    pub async fn overview(&self, user_id: Uuid) -> ResultEngine<Overview> {
        with_tx!(self, |db_tx| {
            let mut overview = Overview::default();

            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .all(&db_tx)
                .await?;
            for model in &models {
                overview.add_transaction(MoneyCents::new(model.amount_minor), model.recurring)?;
            }

            (overview.pots_saved, overview.pots_goal) = self.pot_totals(&db_tx, user_id).await?;
            (overview.budgets_limit, overview.budgets_spent) =
                self.budget_totals(&db_tx, user_id).await?;

            Ok(overview)
        })
    }
}
