use api_types::{
    auth::{Login, Register},
    budget::{BudgetNew, BudgetUpdate, BudgetView},
    overview::OverviewView,
    pot::{PotInput, PotView},
    transaction::{TransactionInput, TransactionQuery, TransactionView},
};
use chrono::Utc;
use engine::MoneyCents;
use uuid::Uuid;

use crate::{
    BudgetCommand, Command, PotArgs, PotCommand, TxArgs, TxCommand,
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    local_state::{self, LocalState, SessionEntry},
    prompt,
};

/// Everything one invocation needs: settings, the stored session and a
/// client carrying its token.
pub struct Session {
    settings: AppConfig,
    state: LocalState,
    client: Client,
}

impl Session {
    pub fn open(settings: AppConfig) -> Result<Self> {
        let state = LocalState::load(local_state::default_state_path())?;
        let token = state
            .session_for(&settings.base_url, Utc::now())
            .map(|entry| entry.token.clone());
        let client = Client::new(&settings.base_url)?.with_token(token);
        Ok(Self {
            settings,
            state,
            client,
        })
    }

    /// Drops the stored token for the configured server.
    pub fn forget(&mut self) -> Result<()> {
        self.state.clear_session(&self.settings.base_url);
        self.state.save(local_state::default_state_path())
    }

    fn email(&self) -> Result<String> {
        if !self.settings.email.is_empty() {
            return Ok(self.settings.email.clone());
        }
        let email = prompt::prompt_line("Email: ")?;
        if email.is_empty() {
            return Err(AppError::Input("email must not be empty".to_string()));
        }
        Ok(email)
    }

    pub async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Register {
                first_name,
                last_name,
            } => self.register(first_name, last_name).await,
            Command::Login => self.login().await,
            Command::Logout => self.logout().await,
            Command::Overview => {
                print_overview(&self.client.overview().await?);
                Ok(())
            }
            Command::Tx(command) => self.transactions(command).await,
            Command::Budget(command) => self.budgets(command).await,
            Command::Pot(command) => self.pots(command).await,
        }
    }

    async fn register(&mut self, first_name: String, last_name: String) -> Result<()> {
        let email = self.email()?;
        let password = prompt::prompt_new_password()?;
        let registered = self
            .client
            .register(&Register {
                email,
                password,
                first_name,
                last_name,
            })
            .await?;
        println!("registered {}", registered.user_id);
        Ok(())
    }

    async fn login(&mut self) -> Result<()> {
        let email = self.email()?;
        let password = prompt::prompt_password("Password: ")?;
        let session = self
            .client
            .login(&Login {
                email: email.clone(),
                password,
            })
            .await?;

        self.state.set_session(SessionEntry {
            base_url: self.settings.base_url.clone(),
            email,
            token: session.token,
            expires_at: session.expires_at,
        });
        self.state.save(local_state::default_state_path())?;
        tracing::debug!(user_id = %session.user_id, "session stored");
        println!("logged in until {}", session.expires_at.format("%Y-%m-%d %H:%M UTC"));
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        let outcome = self.client.logout().await;
        self.forget()?;
        outcome?;
        println!("logged out");
        Ok(())
    }

    async fn transactions(&self, command: TxCommand) -> Result<()> {
        match command {
            TxCommand::List {
                category,
                recurring,
            } => {
                let query = TransactionQuery {
                    category,
                    recurring: recurring.then_some(true),
                };
                let res = self.client.transactions(&query).await?;
                if res.transactions.is_empty() {
                    println!("no transactions");
                }
                for tx in &res.transactions {
                    print_transaction(tx);
                }
            }
            TxCommand::Show { id } => print_transaction(&self.client.transaction(id).await?),
            TxCommand::Add(args) => {
                let tx = self.client.create_transaction(&transaction_input(args)).await?;
                print_transaction(&tx);
            }
            TxCommand::Edit { id, args } => {
                let tx = self
                    .client
                    .update_transaction(id, &transaction_input(args))
                    .await?;
                print_transaction(&tx);
            }
            TxCommand::Rm { id } => {
                self.client.delete_transaction(id).await?;
                println!("deleted {id}");
            }
        }
        Ok(())
    }

    async fn budgets(&self, command: BudgetCommand) -> Result<()> {
        match command {
            BudgetCommand::List => {
                let res = self.client.budgets().await?;
                if res.budgets.is_empty() {
                    println!("no budgets");
                }
                for budget in &res.budgets {
                    print_budget(budget);
                }
            }
            BudgetCommand::Show { id } => print_budget(&self.client.budget(id).await?),
            BudgetCommand::Add {
                category,
                limit,
                spent,
                theme,
                date,
            } => {
                let budget = self
                    .client
                    .create_budget(&BudgetNew {
                        category,
                        limit_minor: limit.cents(),
                        spent_minor: spent.cents(),
                        theme,
                        date,
                    })
                    .await?;
                print_budget(&budget);
            }
            BudgetCommand::Edit {
                id,
                category,
                limit,
                spent,
                theme,
            } => {
                let update = BudgetUpdate {
                    category,
                    limit_minor: limit.map(MoneyCents::cents),
                    spent_minor: spent.map(MoneyCents::cents),
                    theme,
                };
                print_budget(&self.client.update_budget(id, &update).await?);
            }
            BudgetCommand::Rm { id } => {
                self.client.delete_budget(id).await?;
                println!("deleted {id}");
            }
        }
        Ok(())
    }

    async fn pots(&self, command: PotCommand) -> Result<()> {
        match command {
            PotCommand::List => {
                let res = self.client.pots().await?;
                if res.pots.is_empty() {
                    println!("no pots");
                }
                for pot in &res.pots {
                    print_pot(pot);
                }
            }
            PotCommand::Show { id } => print_pot(&self.client.pot(id).await?),
            PotCommand::Add(args) => print_pot(&self.client.create_pot(&pot_input(args)).await?),
            PotCommand::Edit { id, args } => {
                print_pot(&self.client.update_pot(id, &pot_input(args)).await?);
            }
            PotCommand::Rm { id } => {
                self.client.delete_pot(id).await?;
                println!("deleted {id}");
            }
            PotCommand::Deposit { id, amount } => {
                let pot = self.client.pot(id).await?;
                println!(
                    "{}: saved {} of {}, you can deposit up to {}",
                    pot.name,
                    money(pot.current_minor),
                    money(pot.goal_minor),
                    money(pot.remaining_minor)
                );
                self.client.deposit(id, amount.cents()).await?;
                self.show_moved_pot(id).await?;
            }
            PotCommand::Withdraw { id, amount } => {
                let pot = self.client.pot(id).await?;
                println!(
                    "{}: saved {} of {}, you can withdraw up to {}",
                    pot.name,
                    money(pot.current_minor),
                    money(pot.goal_minor),
                    money(pot.current_minor)
                );
                self.client.withdraw(id, amount.cents()).await?;
                self.show_moved_pot(id).await?;
            }
        }
        Ok(())
    }

    /// Reads the pot again; the move dropped the cached copy.
    async fn show_moved_pot(&self, id: Uuid) -> Result<()> {
        print_pot(&self.client.pot(id).await?);
        Ok(())
    }
}

fn transaction_input(args: TxArgs) -> TransactionInput {
    TransactionInput {
        name: args.name,
        amount_minor: args.amount.cents(),
        category: args.category,
        date: args.date.unwrap_or_else(|| Utc::now().date_naive()),
        recurring: args.recurring,
    }
}

fn pot_input(args: PotArgs) -> PotInput {
    PotInput {
        name: args.name,
        goal_minor: args.goal.cents(),
        current_minor: args.current.cents(),
        theme: args.theme,
    }
}

fn money(minor: i64) -> MoneyCents {
    MoneyCents::new(minor)
}

fn print_transaction(tx: &TransactionView) {
    let recurring = if tx.recurring { " (recurring)" } else { "" };
    println!(
        "{}  {}  {:>12}  {:<14}  {}{recurring}",
        tx.id,
        tx.date,
        money(tx.amount_minor).to_string(),
        tx.category,
        tx.name
    );
}

fn print_budget(budget: &BudgetView) {
    println!(
        "{}  {:<14}  spent {} of {}, {} left  [{}]",
        budget.id,
        budget.category,
        money(budget.spent_minor),
        money(budget.limit_minor),
        money(budget.remaining_minor),
        budget.theme
    );
}

fn print_pot(pot: &PotView) {
    println!(
        "{}  {:<20}  saved {} of {}, {} to go  [{}]",
        pot.id,
        pot.name,
        money(pot.current_minor),
        money(pot.goal_minor),
        money(pot.remaining_minor),
        pot.theme
    );
}

fn print_overview(overview: &OverviewView) {
    println!("Current balance   {}", money(overview.balance_minor));
    println!("Income            {}", money(overview.income_minor));
    println!("Expenses          {}", money(overview.expenses_minor));
    println!(
        "Pots              {} saved of {}",
        money(overview.pots_saved_minor),
        money(overview.pots_goal_minor)
    );
    println!(
        "Budgets           {} spent of {}",
        money(overview.budgets_spent_minor),
        money(overview.budgets_limit_minor)
    );
    println!("Recurring bills   {}", money(overview.recurring_bills_minor));
}
