use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetCmd, BudgetUpdateCmd, Category, EngineError, MoneyCents, ResultEngine, Theme,
    budgets,
};

use super::{Engine, overview::totals_overflow, parse_theme, with_tx};

impl Engine {
    /// Lists the user's budgets.
    pub async fn list_budgets(&self, user_id: Uuid) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            let models = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id))
                .order_by_asc(budgets::Column::Category)
                .all(&db_tx)
                .await?;

            models
                .into_iter()
                .map(Budget::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Return a single budget.
    pub async fn budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, budget_id, user_id).await?;
            Budget::try_from(model)
        })
    }

    /// Creates a budget for a category the user has no budget for yet.
    ///
    /// Rejects `limit <= 0`, `spent < 0` and duplicate categories. The
    /// duplicate check and the insert run in the same DB transaction.
    pub async fn create_budget(&self, user_id: Uuid, cmd: BudgetCmd) -> ResultEngine<Budget> {
        let category = Category::try_from(cmd.category.as_str())?;
        let theme = parse_theme(cmd.theme.as_deref(), Theme::BUDGET_DEFAULT)?;
        let date = cmd.date.unwrap_or_else(|| Utc::now().date_naive());
        let budget = Budget::new(user_id, category, cmd.limit, cmd.spent, theme, date)?;

        with_tx!(self, |db_tx| {
            self.ensure_budget_category_free(&db_tx, user_id, category, None)
                .await?;
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            tracing::info!(budget_id = %budget.id, %user_id, %category, "budget created");
            Ok(budget)
        })
    }

    /// Updates the given fields of a budget.
    ///
    /// Moving a budget to another category runs the same uniqueness check as
    /// creation, ignoring the budget itself.
    pub async fn update_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        cmd: BudgetUpdateCmd,
    ) -> ResultEngine<Budget> {
        if cmd.is_empty() {
            return Err(EngineError::InvalidAmount(
                "provide at least one field to update".to_string(),
            ));
        }
        let category = cmd
            .category
            .as_deref()
            .map(Category::try_from)
            .transpose()?;
        let theme = cmd.theme.as_deref().map(Theme::try_from).transpose()?;

        with_tx!(self, |db_tx| {
            let current = Budget::try_from(self.require_budget(&db_tx, budget_id, user_id).await?)?;

            let limit = cmd.limit.unwrap_or(current.limit);
            let spent = cmd.spent.unwrap_or(current.spent);
            budgets::validate_amounts(limit, spent)?;

            let category = category.unwrap_or(current.category);
            if category != current.category {
                self.ensure_budget_category_free(&db_tx, user_id, category, Some(budget_id))
                    .await?;
            }

            let active = budgets::ActiveModel {
                id: ActiveValue::Unchanged(budget_id),
                category: ActiveValue::Set(category.as_str().to_string()),
                limit_amount: ActiveValue::Set(limit.cents()),
                spent_amount: ActiveValue::Set(spent.cents()),
                theme: ActiveValue::Set(theme.unwrap_or(current.theme).as_str().to_string()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Budget::try_from(model)
        })
    }

    /// Deletes a budget.
    pub async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, budget_id, user_id).await?;
            budgets::Entity::delete_by_id(budget_id)
                .exec(&db_tx)
                .await?;
            tracing::info!(%budget_id, %user_id, "budget deleted");
            Ok(())
        })
    }

    /// Total limit and spent over the user's budgets.
    pub(super) async fn budget_totals(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<(MoneyCents, MoneyCents)> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        let limit = MoneyCents::checked_sum(models.iter().map(|m| MoneyCents::new(m.limit_amount)))
            .ok_or_else(totals_overflow)?;
        let spent = MoneyCents::checked_sum(models.iter().map(|m| MoneyCents::new(m.spent_amount)))
            .ok_or_else(totals_overflow)?;
        Ok((limit, spent))
    }

    async fn ensure_budget_category_free(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        category: Category,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::Category.eq(category.as_str()));
        if let Some(budget_id) = exclude {
            query = query.filter(budgets::Column::Id.ne(budget_id));
        }

        if query.one(db).await?.is_some() {
            tracing::warn!(%user_id, %category, "duplicate budget rejected");
            return Err(EngineError::ExistingKey(
                "duplicate budget, please choose another category".to_string(),
            ));
        }
        Ok(())
    }
}
