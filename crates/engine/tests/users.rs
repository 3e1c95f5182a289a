use chrono::Duration;
use engine::{Engine, EngineError, RegisterCmd};
use sea_orm::{ConnectionTrait, DbBackend, Statement};

mod common;
use common::{engine_with_db, register};

fn cmd(email: &str, password: &str) -> RegisterCmd {
    RegisterCmd {
        email: email.to_string(),
        password: password.to_string(),
        first_name: "Maria".to_string(),
        last_name: "Bianchi".to_string(),
    }
}

#[tokio::test]
async fn register_then_login_and_authenticate() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "  Maria@Example.com ").await;

    let session = engine.login("maria@example.com", "Secret123").await.unwrap();
    assert_eq!(session.user_id, user_id);
    assert!(session.expires_at > session.created_at);

    let user = engine.authenticate_session(&session.token).await.unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(user.email, "maria@example.com");
    assert_eq!(engine.user(user_id).await.unwrap(), user);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "maria@example.com").await;

    let err = engine
        .register(cmd("MARIA@example.com", "Another123"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey("an account with this email already exists".to_string())
    );
}

#[tokio::test]
async fn register_validates_input() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.register(cmd("not-an-email", "Secret123")).await,
        Err(EngineError::InvalidCredentials(_))
    ));
    assert!(matches!(
        engine.register(cmd("maria@example.com", "secret123")).await,
        Err(EngineError::InvalidCredentials(_))
    ));

    let mut short_name = cmd("maria@example.com", "Secret123");
    short_name.first_name = "M".to_string();
    assert!(matches!(
        engine.register(short_name).await,
        Err(EngineError::InvalidName(_))
    ));
}

#[tokio::test]
async fn wrong_credentials_share_one_error() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "maria@example.com").await;

    let expected = EngineError::Unauthorized("invalid email or password".to_string());
    assert_eq!(
        engine.login("maria@example.com", "Wrong1234").await.unwrap_err(),
        expected
    );
    assert_eq!(
        engine.login("nobody@example.com", "Secret123").await.unwrap_err(),
        expected
    );
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "maria@example.com").await;
    let session = engine.login("maria@example.com", "Secret123").await.unwrap();

    engine.logout(&session.token).await.unwrap();
    assert!(matches!(
        engine.authenticate_session(&session.token).await,
        Err(EngineError::Unauthorized(_))
    ));
    // Idempotent.
    engine.logout(&session.token).await.unwrap();
}

#[tokio::test]
async fn expired_session_is_unauthorized() {
    let (_, db) = engine_with_db().await;
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .session_ttl(Duration::milliseconds(1))
        .build()
        .await
        .unwrap();
    register(&engine, "maria@example.com").await;
    let session = engine.login("maria@example.com", "Secret123").await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(matches!(
        engine.authenticate_session(&session.token).await,
        Err(EngineError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn non_positive_session_ttl_is_rejected() {
    let (_, db) = engine_with_db().await;
    assert!(
        Engine::builder()
            .database(db)
            .session_ttl(Duration::zero())
            .build()
            .await
            .is_err()
    );
}

#[tokio::test]
async fn password_cost_outside_bcrypt_range_is_rejected() {
    for cost in [3, 32] {
        let (_, db) = engine_with_db().await;
        let err = Engine::builder()
            .database(db)
            .password_cost(cost)
            .build()
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("password cost must be between 4 and 31".to_string())
        );
    }
}

#[tokio::test]
async fn passwords_are_stored_as_bcrypt_hashes() {
    let (engine, db) = engine_with_db().await;
    register(&engine, "maria@example.com").await;

    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT password_hash FROM users",
        ))
        .await
        .unwrap()
        .unwrap();
    let hash: String = row.try_get("", "password_hash").unwrap();
    assert!(hash.starts_with("$2"));
    assert!(!hash.contains("Secret123"));
    assert!(engine.login("maria@example.com", "Secret123").await.is_ok());
}
