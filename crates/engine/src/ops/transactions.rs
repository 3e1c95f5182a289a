use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, ResultEngine, Transaction, TransactionCmd, transactions};

use super::{Engine, normalize_required_name, with_tx};

/// Filters for listing transactions.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    /// Only transactions tagged with this category.
    pub category: Option<Category>,
    /// `Some(true)` returns recurring bills only, `Some(false)` one-off
    /// transactions only.
    pub recurring: Option<bool>,
}

impl TransactionListFilter {
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = Some(recurring);
        self
    }
}

fn validated(cmd: &TransactionCmd) -> ResultEngine<(String, Category)> {
    let name = normalize_required_name(&cmd.name, "transaction")?;
    let category = Category::try_from(cmd.category.as_str())?;
    Ok((name, category))
}

impl Engine {
    /// Lists the user's transactions, newest first.
    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let mut query =
                transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));
            if let Some(category) = filter.category {
                query = query.filter(transactions::Column::Category.eq(category.as_str()));
            }
            if let Some(recurring) = filter.recurring {
                query = query.filter(transactions::Column::Recurring.eq(recurring));
            }

            let models = query
                .order_by_desc(transactions::Column::Date)
                .order_by_asc(transactions::Column::Name)
                .all(&db_tx)
                .await?;

            models
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Return a single transaction.
    pub async fn transaction(&self, user_id: Uuid, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            Transaction::try_from(model)
        })
    }

    /// Records a new transaction and returns it.
    pub async fn create_transaction(
        &self,
        user_id: Uuid,
        cmd: TransactionCmd,
    ) -> ResultEngine<Transaction> {
        let (name, category) = validated(&cmd)?;
        let tx = Transaction::new(user_id, name, cmd.amount, category, cmd.date, cmd.recurring);

        with_tx!(self, |db_tx| {
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            tracing::info!(transaction_id = %tx.id, %user_id, "transaction created");
            Ok(tx)
        })
    }

    /// Replaces every field of an existing transaction.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        cmd: TransactionCmd,
    ) -> ResultEngine<Transaction> {
        let (name, category) = validated(&cmd)?;

        with_tx!(self, |db_tx| {
            self.require_transaction(&db_tx, transaction_id, user_id)
                .await?;

            let active = transactions::ActiveModel {
                id: ActiveValue::Unchanged(transaction_id),
                name: ActiveValue::Set(name),
                amount_minor: ActiveValue::Set(cmd.amount.cents()),
                category: ActiveValue::Set(category.as_str().to_string()),
                date: ActiveValue::Set(cmd.date),
                recurring: ActiveValue::Set(cmd.recurring),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    /// Deletes a transaction.
    pub async fn delete_transaction(&self, user_id: Uuid, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            tracing::info!(%transaction_id, %user_id, "transaction deleted");
            Ok(())
        })
    }
}
