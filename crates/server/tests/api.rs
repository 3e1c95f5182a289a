use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    router(ServerState::new(engine))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login_as(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "Secret123",
            "first_name": "Alice",
            "last_name": "Rossi",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "Secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/pots", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::GET, "/pots", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = app().await;
    login_as(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "Wrong1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "invalid email or password" }));
}

#[tokio::test]
async fn pot_deposit_and_withdraw_guards() {
    let app = app().await;
    let token = login_as(&app, "alice@example.com").await;

    let (status, pot) = send(
        &app,
        Method::POST,
        "/pots",
        Some(&token),
        Some(json!({ "name": "Laptop", "goal_minor": 10000, "current_minor": 9000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pot["theme"], "green");
    let id = pot["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/pots/{id}/deposit"),
        Some(&token),
        Some(json!({ "amount_minor": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "deposit would exceed the goal amount of $100.00; you can deposit up to $10.00"
    );

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/pots/{id}/deposit"),
        Some(&token),
        Some(json!({ "amount_minor": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_minor"], 10000);
    assert_eq!(body["remaining_minor"], 0);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/pots/{id}/withdraw"),
        Some(&token),
        Some(json!({ "amount_minor": 10001 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "withdrawal would exceed the current amount of $100.00; you can withdraw up to $100.00"
    );
}

#[tokio::test]
async fn duplicate_budget_is_a_conflict() {
    let app = app().await;
    let token = login_as(&app, "alice@example.com").await;
    let budget = json!({ "category": "groceries", "limit_minor": 30000 });

    let (status, created) = send(&app, Method::POST, "/budgets", Some(&token), Some(budget.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["theme"], "cyan");
    assert_eq!(created["remaining_minor"], 30000);

    let (status, body) = send(&app, Method::POST, "/budgets", Some(&token), Some(budget)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "duplicate budget, please choose another category"
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/budgets",
        Some(&token),
        Some(json!({ "category": "bills", "limit_minor": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "budget limit must be greater than 0");
}

#[tokio::test]
async fn foreign_records_are_forbidden() {
    let app = app().await;
    let alice = login_as(&app, "alice@example.com").await;
    let bob = login_as(&app, "bob@example.com").await;

    let (_, tx) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(&alice),
        Some(json!({
            "name": "Rent",
            "amount_minor": -90000,
            "category": "bills",
            "date": "2025-08-01",
            "recurring": true,
        })),
    )
    .await;
    let id = tx["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::DELETE, &format!("/transactions/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "missing or insufficient permissions");

    let (status, _) = send(&app, Method::DELETE, &format!("/transactions/{id}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/transactions/not-a-uuid", Some(&alice), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn transactions_filter_and_overview() {
    let app = app().await;
    let token = login_as(&app, "alice@example.com").await;

    for (name, amount, category, recurring) in [
        ("Salary", 250000, "general", false),
        ("Rent", -90000, "bills", true),
        ("Dinner", -4500, "dining-out", false),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/transactions",
            Some(&token),
            Some(json!({
                "name": name,
                "amount_minor": amount,
                "category": category,
                "date": "2025-08-01",
                "recurring": recurring,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/transactions?recurring=true", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(body["transactions"][0]["name"], "Rent");

    let (status, body) = send(&app, Method::GET, "/transactions?category=dining-out", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"][0]["name"], "Dinner");

    let (status, _) = send(&app, Method::GET, "/transactions?category=crypto", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, Method::GET, "/overview", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance_minor"], 155500);
    assert_eq!(body["income_minor"], 250000);
    assert_eq!(body["expenses_minor"], 94500);
    assert_eq!(body["recurring_bills_minor"], 90000);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = app().await;
    let token = login_as(&app, "alice@example.com").await;

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/overview", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
