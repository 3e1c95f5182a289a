//! Domain rules and storage for the personal finance dashboard.
//!
//! Every operation lives on [`Engine`] and is scoped to the user that owns
//! the records. Monetary values are [`MoneyCents`].

pub use budgets::Budget;
pub use category::Category;
pub use commands::{BudgetCmd, BudgetUpdateCmd, PotCmd, RegisterCmd, TransactionCmd};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{
    DEFAULT_SESSION_TTL_HOURS, Engine, EngineBuilder, Overview, TransactionListFilter,
};
pub use pots::Pot;
pub use sessions::Session;
pub use theme::Theme;
pub use transactions::Transaction;
pub use users::User;

mod budgets;
mod category;
mod commands;
mod error;
mod money;
mod ops;
mod pots;
mod sessions;
mod theme;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
