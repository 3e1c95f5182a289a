use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, RegisterCmd, ResultEngine, Session, User, sessions, users,
    util::{
        hash_password, new_session_token, normalize_email, normalize_person_name, validate_email,
        validate_password, verify_password,
    },
};

use super::{Engine, with_tx};

const INVALID_LOGIN: &str = "invalid email or password";
const SESSION_EXPIRED: &str = "session expired or unknown, please log in again";

impl Engine {
    /// Creates a new account and returns its id.
    pub async fn register(&self, cmd: RegisterCmd) -> ResultEngine<Uuid> {
        let email = normalize_email(&cmd.email);
        validate_email(&email)?;
        validate_password(&cmd.password)?;
        let first_name = normalize_person_name(&cmd.first_name, "first name")?;
        let last_name = normalize_person_name(&cmd.last_name, "last name")?;

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                tracing::warn!("registration rejected: email already taken");
                return Err(EngineError::ExistingKey(
                    "an account with this email already exists".to_string(),
                ));
            }

            let user_id = Uuid::new_v4();
            users::ActiveModel {
                id: ActiveValue::Set(user_id),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(hash_password(&cmd.password, self.password_cost)?),
                first_name: ActiveValue::Set(first_name),
                last_name: ActiveValue::Set(last_name),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(%user_id, "user registered");
            Ok(user_id)
        })
    }

    /// Checks the credentials and opens a new session.
    ///
    /// Unknown emails and wrong passwords give the same error.
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<Session> {
        let email = normalize_email(email);

        with_tx!(self, |db_tx| {
            let Some(user) = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .one(&db_tx)
                .await?
            else {
                tracing::warn!("login rejected: unknown email");
                return Err(EngineError::Unauthorized(INVALID_LOGIN.to_string()));
            };
            if !verify_password(password, &user.password_hash)? {
                tracing::warn!(user_id = %user.id, "login rejected: wrong password");
                return Err(EngineError::Unauthorized(INVALID_LOGIN.to_string()));
            }

            let now = Utc::now();
            sessions::Entity::delete_many()
                .filter(sessions::Column::UserId.eq(user.id))
                .filter(sessions::Column::ExpiresAt.lte(now))
                .exec(&db_tx)
                .await?;

            let model = sessions::ActiveModel {
                token: ActiveValue::Set(new_session_token()),
                user_id: ActiveValue::Set(user.id),
                created_at: ActiveValue::Set(now),
                expires_at: ActiveValue::Set(now + self.session_ttl),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(user_id = %user.id, "user logged in");
            Ok(Session::from(model))
        })
    }

    /// Resolves a bearer token to its user.
    pub async fn authenticate_session(&self, token: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let session = sessions::Entity::find_by_id(token.to_string())
                .one(&db_tx)
                .await?
                .map(Session::from)
                .ok_or_else(|| EngineError::Unauthorized(SESSION_EXPIRED.to_string()))?;
            if session.is_expired(Utc::now()) {
                return Err(EngineError::Unauthorized(SESSION_EXPIRED.to_string()));
            }

            let user = users::Entity::find_by_id(session.user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::Unauthorized(SESSION_EXPIRED.to_string()))?;
            Ok(User::from(user))
        })
    }

    /// Ends a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = sessions::Entity::delete_by_id(token.to_string())
                .exec(&db_tx)
                .await?;
            if result.rows_affected > 0 {
                tracing::info!("session closed");
            }
            Ok(())
        })
    }

    /// Return the user with the given id.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            users::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .map(User::from)
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
        })
    }
}
