#![allow(dead_code)]

use engine::{Engine, RegisterCmd};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn register(engine: &Engine, email: &str) -> Uuid {
    engine
        .register(RegisterCmd {
            email: email.to_string(),
            password: "Secret123".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Rossi".to_string(),
        })
        .await
        .unwrap()
}

/// Engine with two registered users, `alice` and `bob`.
pub async fn engine_with_users() -> (Engine, Uuid, Uuid) {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com").await;
    let bob = register(&engine, "bob@example.com").await;
    (engine, alice, bob)
}
