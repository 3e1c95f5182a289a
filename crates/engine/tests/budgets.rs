use chrono::NaiveDate;
use engine::{BudgetCmd, BudgetUpdateCmd, Category, EngineError, MoneyCents, Theme};

mod common;
use common::engine_with_users;

fn duplicate() -> EngineError {
    EngineError::ExistingKey("duplicate budget, please choose another category".to_string())
}

#[tokio::test]
async fn create_budget_with_defaults() {
    let (engine, alice, _) = engine_with_users().await;

    let budget = engine
        .create_budget(alice, BudgetCmd::new("Groceries", MoneyCents::new(300_00)))
        .await
        .unwrap();

    assert_eq!(budget.category, Category::Groceries);
    assert_eq!(budget.spent, MoneyCents::ZERO);
    assert_eq!(budget.theme, Theme::Cyan);
    assert_eq!(engine.list_budgets(alice).await.unwrap(), vec![budget]);
}

#[tokio::test]
async fn second_budget_for_same_category_is_rejected() {
    let (engine, alice, bob) = engine_with_users().await;
    engine
        .create_budget(alice, BudgetCmd::new("bills", MoneyCents::new(750_00)))
        .await
        .unwrap();

    let err = engine
        .create_budget(alice, BudgetCmd::new("Bills", MoneyCents::new(100_00)))
        .await
        .unwrap_err();
    assert_eq!(err, duplicate());

    engine
        .create_budget(alice, BudgetCmd::new("dining-out", MoneyCents::new(100_00)))
        .await
        .unwrap();
    // Uniqueness is per user.
    engine
        .create_budget(bob, BudgetCmd::new("bills", MoneyCents::new(100_00)))
        .await
        .unwrap();

    assert_eq!(engine.list_budgets(alice).await.unwrap().len(), 2);
}

#[tokio::test]
async fn budget_amounts_are_validated() {
    let (engine, alice, _) = engine_with_users().await;

    let err = engine
        .create_budget(alice, BudgetCmd::new("general", MoneyCents::ZERO))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("budget limit must be greater than 0".to_string())
    );

    let err = engine
        .create_budget(
            alice,
            BudgetCmd::new("general", MoneyCents::new(10_00)).spent(MoneyCents::new(-1_00)),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("spent amount cannot be negative".to_string())
    );

    let err = engine
        .create_budget(alice, BudgetCmd::new("crypto", MoneyCents::new(10_00)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCategory(_)));
}

#[tokio::test]
async fn update_budget_keeps_category_unique() {
    let (engine, alice, _) = engine_with_users().await;
    let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let groceries = engine
        .create_budget(
            alice,
            BudgetCmd::new("groceries", MoneyCents::new(300_00)).date(date),
        )
        .await
        .unwrap();
    engine
        .create_budget(alice, BudgetCmd::new("shopping", MoneyCents::new(100_00)))
        .await
        .unwrap();

    let err = engine
        .update_budget(
            alice,
            groceries.id,
            BudgetUpdateCmd {
                category: Some("shopping".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, duplicate());

    // Re-saving the same category is not a duplicate of itself.
    let updated = engine
        .update_budget(
            alice,
            groceries.id,
            BudgetUpdateCmd {
                category: Some("groceries".to_string()),
                spent: Some(MoneyCents::new(120_00)),
                theme: Some("rose".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category, Category::Groceries);
    assert_eq!(updated.limit, MoneyCents::new(300_00));
    assert_eq!(updated.spent, MoneyCents::new(120_00));
    assert_eq!(updated.theme, Theme::Rose);
    assert_eq!(updated.date, date);

    let moved = engine
        .update_budget(
            alice,
            groceries.id,
            BudgetUpdateCmd {
                category: Some("education".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.category, Category::Education);
}

#[tokio::test]
async fn update_budget_rejects_empty_and_invalid_changes() {
    let (engine, alice, _) = engine_with_users().await;
    let budget = engine
        .create_budget(alice, BudgetCmd::new("lifestyle", MoneyCents::new(50_00)))
        .await
        .unwrap();

    assert!(
        engine
            .update_budget(alice, budget.id, BudgetUpdateCmd::default())
            .await
            .is_err()
    );

    let err = engine
        .update_budget(
            alice,
            budget.id,
            BudgetUpdateCmd {
                limit: Some(MoneyCents::ZERO),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("budget limit must be greater than 0".to_string())
    );
    assert_eq!(
        engine.budget(alice, budget.id).await.unwrap().limit,
        MoneyCents::new(50_00)
    );
}

#[tokio::test]
async fn foreign_budget_is_forbidden_and_delete_works() {
    let (engine, alice, bob) = engine_with_users().await;
    let budget = engine
        .create_budget(alice, BudgetCmd::new("education", MoneyCents::new(80_00)))
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_budget(bob, budget.id).await,
        Err(EngineError::Forbidden(_))
    ));

    engine.delete_budget(alice, budget.id).await.unwrap();
    assert!(matches!(
        engine.budget(alice, budget.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    // The category is free again.
    engine
        .create_budget(alice, BudgetCmd::new("education", MoneyCents::new(80_00)))
        .await
        .unwrap();
}
