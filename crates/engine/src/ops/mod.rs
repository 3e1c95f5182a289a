use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine, Theme};

mod access;
mod budgets;
mod overview;
mod pots;
mod transactions;
mod users;

pub use overview::Overview;
pub use transactions::TransactionListFilter;

/// Default lifetime of a login session.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

const MIN_PASSWORD_COST: u32 = 4;
const MAX_PASSWORD_COST: u32 = 31;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    session_ttl: Duration,
    password_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_theme(value: Option<&str>, default: Theme) -> ResultEngine<Theme> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Theme::try_from(raw),
        None => Ok(default),
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    session_ttl: Duration,
    password_cost: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override how long login sessions stay valid.
    pub fn session_ttl(mut self, ttl: Duration) -> EngineBuilder {
        self.session_ttl = ttl;
        self
    }

    /// Override the bcrypt work factor used for new passwords (4 to 31).
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = cost;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.session_ttl <= Duration::zero() {
            return Err(EngineError::InvalidAmount(
                "session ttl must be positive".to_string(),
            ));
        }
        if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&self.password_cost) {
            return Err(EngineError::InvalidAmount(format!(
                "password cost must be between {MIN_PASSWORD_COST} and {MAX_PASSWORD_COST}"
            )));
        }
        Ok(Engine {
            database: self.database,
            session_ttl: self.session_ttl,
            password_cost: self.password_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed() {
        assert_eq!(normalize_required_name("  Car ", "pot").unwrap(), "Car");
        assert_eq!(
            normalize_required_name("   ", "pot").unwrap_err(),
            EngineError::InvalidName("pot name must not be empty".to_string())
        );
    }

    #[test]
    fn theme_falls_back_to_default() {
        assert_eq!(parse_theme(None, Theme::Cyan).unwrap(), Theme::Cyan);
        assert_eq!(parse_theme(Some(" "), Theme::Green).unwrap(), Theme::Green);
        assert_eq!(parse_theme(Some("Rose"), Theme::Green).unwrap(), Theme::Rose);
        assert!(parse_theme(Some("chartreuse"), Theme::Green).is_err());
    }
}
