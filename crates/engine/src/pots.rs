//! The module contains the `Pot` struct and its balance guard.
//!
//! A pot is a savings goal: a target `goal` and the amount `current` put
//! aside so far. Money moves in and out of a pot only through
//! [`Pot::check_deposit`] and [`Pot::check_withdraw`], which keep the pot
//! inside its bounds:
//!
//! $0 <= current <= goal$
//!
//! ** Examples
//!
//! With a goal of $100.00 and $90.00 saved, a deposit of $20.00 is rejected
//! (at most $10.00 fits). With $30.00 saved, a withdrawal of $50.00 is
//! rejected (at most $30.00 can be taken out).

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, Theme};

/// A savings pot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub goal: MoneyCents,
    pub current: MoneyCents,
    pub theme: Theme,
}

impl Pot {
    pub fn new(
        user_id: Uuid,
        name: String,
        goal: MoneyCents,
        current: MoneyCents,
        theme: Theme,
    ) -> ResultEngine<Self> {
        validate_bounds(goal, current)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            goal,
            current,
            theme,
        })
    }

    /// Amount still missing to reach the goal.
    pub fn remaining(&self) -> MoneyCents {
        self.goal - self.current
    }

    /// Computes the balance after depositing `amount`, without applying it.
    pub fn check_deposit(&self, amount: MoneyCents) -> ResultEngine<MoneyCents> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "deposit amount must be greater than 0".to_string(),
            ));
        }
        // `0 <= current <= goal` holds, so neither side below can overflow.
        if amount > self.remaining() {
            return Err(EngineError::MaxBalanceReached(format!(
                "deposit would exceed the goal amount of {}; you can deposit up to {}",
                self.goal,
                self.remaining()
            )));
        }
        Ok(self.current + amount)
    }

    /// Computes the balance after withdrawing `amount`, without applying it.
    pub fn check_withdraw(&self, amount: MoneyCents) -> ResultEngine<MoneyCents> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "withdrawal amount must be greater than 0".to_string(),
            ));
        }
        if amount > self.current {
            return Err(EngineError::InsufficientFunds(format!(
                "withdrawal would exceed the current amount of {}; you can withdraw up to {}",
                self.current, self.current
            )));
        }
        Ok(self.current - amount)
    }

    pub fn deposit(&mut self, amount: MoneyCents) -> ResultEngine<MoneyCents> {
        self.current = self.check_deposit(amount)?;
        Ok(self.current)
    }

    pub fn withdraw(&mut self, amount: MoneyCents) -> ResultEngine<MoneyCents> {
        self.current = self.check_withdraw(amount)?;
        Ok(self.current)
    }
}

/// Checks the at-rest invariant `goal > 0` and `0 <= current <= goal`.
pub(crate) fn validate_bounds(goal: MoneyCents, current: MoneyCents) -> ResultEngine<()> {
    if !goal.is_positive() {
        return Err(EngineError::InvalidAmount(
            "goal amount must be greater than 0".to_string(),
        ));
    }
    if current.is_negative() {
        return Err(EngineError::InvalidAmount(
            "current amount cannot be negative".to_string(),
        ));
    }
    if current > goal {
        return Err(EngineError::InvalidAmount(format!(
            "current amount {current} exceeds the goal amount of {goal}"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub goal_amount: i64,
    pub current_amount: i64,
    pub theme: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Pot> for ActiveModel {
    fn from(pot: &Pot) -> Self {
        Self {
            id: ActiveValue::Set(pot.id),
            user_id: ActiveValue::Set(pot.user_id),
            name: ActiveValue::Set(pot.name.clone()),
            goal_amount: ActiveValue::Set(pot.goal.cents()),
            current_amount: ActiveValue::Set(pot.current.cents()),
            theme: ActiveValue::Set(pot.theme.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Pot {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            goal: MoneyCents::new(model.goal_amount),
            current: MoneyCents::new(model.current_amount),
            theme: Theme::try_from(model.theme.as_str())?,
        })
    }
}
