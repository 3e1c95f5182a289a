use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, Pot, PotCmd, ResultEngine, Theme, pots};

use super::{Engine, normalize_required_name, overview::totals_overflow, parse_theme, with_tx};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PotMove {
    Deposit,
    Withdraw,
}

impl PotMove {
    fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }
}

fn validated(cmd: &PotCmd) -> ResultEngine<(String, Theme)> {
    let name = normalize_required_name(&cmd.name, "pot")?;
    let theme = parse_theme(cmd.theme.as_deref(), Theme::POT_DEFAULT)?;
    pots::validate_bounds(cmd.goal, cmd.current)?;
    Ok((name, theme))
}

impl Engine {
    /// Lists the user's pots.
    pub async fn list_pots(&self, user_id: Uuid) -> ResultEngine<Vec<Pot>> {
        with_tx!(self, |db_tx| {
            let models = pots::Entity::find()
                .filter(pots::Column::UserId.eq(user_id))
                .order_by_asc(pots::Column::Name)
                .all(&db_tx)
                .await?;

            models
                .into_iter()
                .map(Pot::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Return a single pot.
    pub async fn pot(&self, user_id: Uuid, pot_id: Uuid) -> ResultEngine<Pot> {
        with_tx!(self, |db_tx| {
            let model = self.require_pot(&db_tx, pot_id, user_id).await?;
            Pot::try_from(model)
        })
    }

    /// Creates a pot. The starting balance must already satisfy
    /// `0 <= current <= goal`.
    pub async fn create_pot(&self, user_id: Uuid, cmd: PotCmd) -> ResultEngine<Pot> {
        let (name, theme) = validated(&cmd)?;
        let pot = Pot::new(user_id, name, cmd.goal, cmd.current, theme)?;

        with_tx!(self, |db_tx| {
            pots::ActiveModel::from(&pot).insert(&db_tx).await?;
            tracing::info!(pot_id = %pot.id, %user_id, "pot created");
            Ok(pot)
        })
    }

    /// Replaces name, goal, balance and theme of a pot.
    pub async fn update_pot(&self, user_id: Uuid, pot_id: Uuid, cmd: PotCmd) -> ResultEngine<Pot> {
        let (name, theme) = validated(&cmd)?;

        with_tx!(self, |db_tx| {
            self.require_pot(&db_tx, pot_id, user_id).await?;

            let active = pots::ActiveModel {
                id: ActiveValue::Unchanged(pot_id),
                name: ActiveValue::Set(name),
                goal_amount: ActiveValue::Set(cmd.goal.cents()),
                current_amount: ActiveValue::Set(cmd.current.cents()),
                theme: ActiveValue::Set(theme.as_str().to_string()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Pot::try_from(model)
        })
    }

    /// Deletes a pot.
    pub async fn delete_pot(&self, user_id: Uuid, pot_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_pot(&db_tx, pot_id, user_id).await?;
            pots::Entity::delete_by_id(pot_id).exec(&db_tx).await?;
            tracing::info!(%pot_id, %user_id, "pot deleted");
            Ok(())
        })
    }

    /// Adds `amount` to a pot, refusing to go past its goal.
    pub async fn deposit_pot(
        &self,
        user_id: Uuid,
        pot_id: Uuid,
        amount: MoneyCents,
    ) -> ResultEngine<Pot> {
        self.move_pot_balance(user_id, pot_id, amount, PotMove::Deposit)
            .await
    }

    /// Takes `amount` out of a pot, refusing to go below zero.
    pub async fn withdraw_pot(
        &self,
        user_id: Uuid,
        pot_id: Uuid,
        amount: MoneyCents,
    ) -> ResultEngine<Pot> {
        self.move_pot_balance(user_id, pot_id, amount, PotMove::Withdraw)
            .await
    }

    /// Total saved and total goal over the user's pots.
    pub(super) async fn pot_totals(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<(MoneyCents, MoneyCents)> {
        let models = pots::Entity::find()
            .filter(pots::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        let saved = MoneyCents::checked_sum(models.iter().map(|m| MoneyCents::new(m.current_amount)))
            .ok_or_else(totals_overflow)?;
        let goal = MoneyCents::checked_sum(models.iter().map(|m| MoneyCents::new(m.goal_amount)))
            .ok_or_else(totals_overflow)?;
        Ok((saved, goal))
    }

    async fn move_pot_balance(
        &self,
        user_id: Uuid,
        pot_id: Uuid,
        amount: MoneyCents,
        kind: PotMove,
    ) -> ResultEngine<Pot> {
        with_tx!(self, |db_tx| {
            let mut pot = Pot::try_from(self.require_pot(&db_tx, pot_id, user_id).await?)?;
            let previous = pot.current;

            let checked = match kind {
                PotMove::Deposit => pot.check_deposit(amount),
                PotMove::Withdraw => pot.check_withdraw(amount),
            };
            let new_current = match checked {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(%pot_id, %amount, "pot {} rejected: {err}", kind.as_str());
                    return Err(err);
                }
            };

            self.swap_pot_balance(&db_tx, pot_id, previous, new_current)
                .await?;
            pot.current = new_current;
            tracing::info!(%pot_id, %amount, current = %pot.current, "pot {}", kind.as_str());
            Ok(pot)
        })
    }

    /// Writes `new_current` only if the stored balance is still `previous`.
    async fn swap_pot_balance(
        &self,
        db: &DatabaseTransaction,
        pot_id: Uuid,
        previous: MoneyCents,
        new_current: MoneyCents,
    ) -> ResultEngine<()> {
        let result = pots::Entity::update_many()
            .col_expr(pots::Column::CurrentAmount, Expr::value(new_current.cents()))
            .filter(pots::Column::Id.eq(pot_id))
            .filter(pots::Column::CurrentAmount.eq(previous.cents()))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::Conflict(
                "pot balance changed in the meantime, reload and try again".to_string(),
            ));
        }
        Ok(())
    }
}
