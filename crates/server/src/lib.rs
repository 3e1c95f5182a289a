use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use uuid::Uuid;

use api_types::ErrorBody;
pub use server::{ServerState, router, run, run_with_listener};

mod auth;
mod budgets;
mod overview;
mod pots;
mod server;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) | EngineError::PasswordHash(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::MaxBalanceReached(_)
        | EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidTheme(_)
        | EngineError::InvalidId(_)
        | EngineError::InvalidCredentials(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::PasswordHash(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            "internal server error".to_string()
        }
        // Business rule messages go out as written, without the variant prefix.
        EngineError::MaxBalanceReached(msg)
        | EngineError::InsufficientFunds(msg)
        | EngineError::ExistingKey(msg)
        | EngineError::InvalidAmount(msg)
        | EngineError::InvalidName(msg)
        | EngineError::InvalidCategory(msg)
        | EngineError::InvalidTheme(msg)
        | EngineError::InvalidId(msg)
        | EngineError::InvalidCredentials(msg)
        | EngineError::Unauthorized(msg)
        | EngineError::Forbidden(msg)
        | EngineError::Conflict(msg) => msg,
        err @ EngineError::KeyNotFound(_) => err.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let (status, error) = (status_for_engine_error(&err), message_for_engine_error(err));

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Parses a record id taken from the URL path.
fn parse_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw)
        .map_err(|_| EngineError::InvalidId(format!("`{raw}` is not a valid id")).into())
}
