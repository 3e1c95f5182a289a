//! `finboard-cli`: command line client of the finboard HTTP API.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use engine::MoneyCents;
use uuid::Uuid;

use crate::error::Result;

mod client;
mod commands;
mod config;
mod error;
mod local_state;
mod prompt;

#[derive(Debug, Parser)]
#[command(name = "finboard-cli", version, about = "Personal finance dashboard client")]
struct Cli {
    #[command(flatten)]
    global: config::GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account for the configured email
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Start a session and remember its token
    Login,
    /// End the current session
    Logout,
    /// Balance, income, expenses and totals of pots, budgets and bills
    Overview,
    /// Manage transactions
    #[command(subcommand)]
    Tx(TxCommand),
    /// Manage budgets
    #[command(subcommand)]
    Budget(BudgetCommand),
    /// Manage savings pots
    #[command(subcommand)]
    Pot(PotCommand),
}

#[derive(Debug, Subcommand)]
enum TxCommand {
    List {
        #[arg(long)]
        category: Option<String>,
        /// Only recurring bills
        #[arg(long)]
        recurring: bool,
    },
    Show {
        id: Uuid,
    },
    Add(TxArgs),
    /// Replace every field of a transaction
    Edit {
        id: Uuid,
        #[command(flatten)]
        args: TxArgs,
    },
    Rm {
        id: Uuid,
    },
}

#[derive(Debug, clap::Args)]
struct TxArgs {
    #[arg(long)]
    name: String,
    /// Signed amount, negative for expenses (e.g. -12.50)
    #[arg(long, allow_negative_numbers = true)]
    amount: MoneyCents,
    #[arg(long)]
    category: String,
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    recurring: bool,
}

#[derive(Debug, Subcommand)]
enum BudgetCommand {
    List,
    Show {
        id: Uuid,
    },
    Add {
        #[arg(long)]
        category: String,
        #[arg(long)]
        limit: MoneyCents,
        #[arg(long, default_value_t = MoneyCents::ZERO)]
        spent: MoneyCents,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change only the given fields
    Edit {
        id: Uuid,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<MoneyCents>,
        #[arg(long)]
        spent: Option<MoneyCents>,
        #[arg(long)]
        theme: Option<String>,
    },
    Rm {
        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
enum PotCommand {
    List,
    Show {
        id: Uuid,
    },
    Add(PotArgs),
    /// Replace every field of a pot
    Edit {
        id: Uuid,
        #[command(flatten)]
        args: PotArgs,
    },
    Rm {
        id: Uuid,
    },
    Deposit {
        id: Uuid,
        amount: MoneyCents,
    },
    Withdraw {
        id: Uuid,
        amount: MoneyCents,
    },
}

#[derive(Debug, clap::Args)]
struct PotArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    goal: MoneyCents,
    #[arg(long, default_value_t = MoneyCents::ZERO)]
    current: MoneyCents,
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("finboard_cli={level}"))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = config::load(&cli.global)?;
    let mut session = commands::Session::open(settings)?;

    let outcome = session.execute(cli.command).await;
    if let Err(error::AppError::Client(client::ClientError::Unauthorized(_))) = &outcome {
        session.forget()?;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_signed_amounts() {
        let cli = Cli::try_parse_from([
            "finboard",
            "tx",
            "add",
            "--name",
            "Groceries run",
            "--amount",
            "-12.50",
            "--category",
            "groceries",
        ])
        .unwrap();
        let Command::Tx(TxCommand::Add(args)) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.amount, MoneyCents::new(-12_50));
        assert!(!args.recurring);
    }

    #[test]
    fn rejects_three_decimals() {
        let id = Uuid::new_v4().to_string();
        assert!(Cli::try_parse_from(["finboard", "pot", "deposit", id.as_str(), "1.005"]).is_err());
    }
}
