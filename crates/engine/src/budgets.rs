//! Per-category spending budgets.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, MoneyCents, ResultEngine, Theme};

/// A spending limit for one category.
///
/// `spent` is provided by the user and is not recomputed from transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub limit: MoneyCents,
    pub spent: MoneyCents,
    pub theme: Theme,
    pub date: NaiveDate,
}

impl Budget {
    pub fn new(
        user_id: Uuid,
        category: Category,
        limit: MoneyCents,
        spent: MoneyCents,
        theme: Theme,
        date: NaiveDate,
    ) -> ResultEngine<Self> {
        validate_amounts(limit, spent)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            category,
            limit,
            spent,
            theme,
            date,
        })
    }

    /// Remaining budget; negative when overspent.
    pub fn remaining(&self) -> MoneyCents {
        self.limit - self.spent
    }
}

pub(crate) fn validate_amounts(limit: MoneyCents, spent: MoneyCents) -> ResultEngine<()> {
    if !limit.is_positive() {
        return Err(EngineError::InvalidAmount(
            "budget limit must be greater than 0".to_string(),
        ));
    }
    if spent.is_negative() {
        return Err(EngineError::InvalidAmount(
            "spent amount cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub limit_amount: i64,
    pub spent_amount: i64,
    pub theme: String,
    pub date: Date,
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

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id),
            user_id: ActiveValue::Set(budget.user_id),
            category: ActiveValue::Set(budget.category.as_str().to_string()),
            limit_amount: ActiveValue::Set(budget.limit.cents()),
            spent_amount: ActiveValue::Set(budget.spent.cents()),
            theme: ActiveValue::Set(budget.theme.as_str().to_string()),
            date: ActiveValue::Set(budget.date),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category: Category::try_from(model.category.as_str())?,
            limit: MoneyCents::new(model.limit_amount),
            spent: MoneyCents::new(model.spent_amount),
            theme: Theme::try_from(model.theme.as_str())?,
            date: model.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_must_be_positive() {
        let err = validate_amounts(MoneyCents::ZERO, MoneyCents::ZERO).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("budget limit must be greater than 0".to_string())
        );
    }

    #[test]
    fn spent_cannot_be_negative() {
        let err = validate_amounts(MoneyCents::new(10_00), MoneyCents::new(-1_00)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("spent amount cannot be negative".to_string())
        );
    }

    #[test]
    fn remaining_can_go_negative() {
        let budget = Budget::new(
            Uuid::new_v4(),
            Category::Groceries,
            MoneyCents::new(50_00),
            MoneyCents::new(65_00),
            Theme::BUDGET_DEFAULT,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();
        assert_eq!(budget.remaining(), MoneyCents::new(-15_00));
    }
}
