use api_types::{
    ErrorBody,
    auth::{Login, Register, Registered, SessionView},
    budget::{BudgetListResponse, BudgetNew, BudgetUpdate, BudgetView},
    overview::OverviewView,
    pot::{PotInput, PotListResponse, PotMove, PotView},
    transaction::{TransactionInput, TransactionListResponse, TransactionQuery, TransactionView},
};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub use cache::{Collection, QueryCache, QueryKey};
pub use retry::RetryPolicy;

mod cache;
mod retry;

const GENERIC_FAILURE: &str = "something went wrong, please try again";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("login rejected: {0}")]
    Credentials(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => Self::Unauthorized(body),
            403 => Self::Forbidden(body),
            404 => Self::NotFound(body),
            409 => Self::Conflict(body),
            422 => Self::Validation(body),
            _ => Self::Server(body),
        }
    }

    /// Failures worth another attempt: the network or the server, not the
    /// request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server(_))
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(_) => "your session has expired, please log in again".to_string(),
            Self::Forbidden(_) => {
                "you do not have permission to access this item".to_string()
            }
            Self::Credentials(msg) | Self::Conflict(msg) | Self::Validation(msg) => msg.clone(),
            Self::NotFound(_) | Self::Server(_) | Self::Transport(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
    cache: QueryCache,
    retry: RetryPolicy,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Input(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token: None,
            cache: QueryCache::default(),
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;
        let builder = self.http.request(method, endpoint);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
        let res = builder.send().await?;
        if res.status().is_success() {
            return Ok(res.json::<T>().await?);
        }
        Err(Self::error_from(res).await)
    }

    async fn send_empty(builder: RequestBuilder) -> ClientResult<()> {
        let res = builder.send().await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(res).await)
    }

    async fn error_from(res: reqwest::Response) -> ClientError {
        let status = res.status();
        let body = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::debug!(%status, "request failed: {body}");
        ClientError::from_status(status, body)
    }

    /// Cached, retried GET.
    async fn query<T, Q>(&self, key: QueryKey, path: &str, params: Option<&Q>) -> ClientResult<T>
    where
        T: DeserializeOwned + Serialize,
        Q: Serialize + ?Sized,
    {
        if let Some(hit) = self.cache.get::<T>(&key).await {
            tracing::debug!(?key, "cache hit");
            return Ok(hit);
        }

        let mut failure_count = 0;
        loop {
            let mut builder = self.request(Method::GET, path)?;
            if let Some(params) = params {
                builder = builder.query(params);
            }
            match Self::send::<T>(builder).await {
                Ok(value) => {
                    self.cache.insert(key, &value).await;
                    return Ok(value);
                }
                Err(err) => {
                    failure_count += 1;
                    if !self.retry.should_retry(failure_count, &err) {
                        return Err(err);
                    }
                    tracing::warn!(failure_count, "retrying {path}: {err}");
                    tokio::time::sleep(self.retry.delay(failure_count)).await;
                }
            }
        }
    }

    /// Runs a write once and drops the cached reads it made stale.
    async fn mutate<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        collection: Collection,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let value = Self::send::<T>(builder).await?;
        self.cache.invalidate(collection).await;
        Ok(value)
    }

    async fn delete(&self, path: &str, collection: Collection) -> ClientResult<()> {
        Self::send_empty(self.request(Method::DELETE, path)?).await?;
        self.cache.invalidate(collection).await;
        Ok(())
    }

    pub async fn register(&self, payload: &Register) -> ClientResult<Registered> {
        Self::send(self.request(Method::POST, "auth/register")?.json(payload)).await
    }

    /// A `401` here means wrong credentials, not an expired session.
    pub async fn login(&self, payload: &Login) -> ClientResult<SessionView> {
        Self::send(self.request(Method::POST, "auth/login")?.json(payload))
            .await
            .map_err(|err| match err {
                ClientError::Unauthorized(msg) => ClientError::Credentials(msg),
                other => other,
            })
    }

    pub async fn logout(&self) -> ClientResult<()> {
        Self::send_empty(self.request(Method::POST, "auth/logout")?).await
    }

    pub async fn overview(&self) -> ClientResult<OverviewView> {
        self.query::<_, ()>(QueryKey::Overview, "overview", None)
            .await
    }

    pub async fn transactions(
        &self,
        query: &TransactionQuery,
    ) -> ClientResult<TransactionListResponse> {
        let key = QueryKey::Transactions {
            category: query.category.clone(),
            recurring: query.recurring,
        };
        self.query(key, "transactions", Some(query)).await
    }

    pub async fn transaction(&self, id: Uuid) -> ClientResult<TransactionView> {
        self.query::<_, ()>(
            QueryKey::Transaction(id),
            &format!("transactions/{id}"),
            None,
        )
        .await
    }

    pub async fn create_transaction(
        &self,
        payload: &TransactionInput,
    ) -> ClientResult<TransactionView> {
        self.mutate(
            Method::POST,
            "transactions",
            Some(payload),
            Collection::Transactions,
        )
        .await
    }

    pub async fn update_transaction(
        &self,
        id: Uuid,
        payload: &TransactionInput,
    ) -> ClientResult<TransactionView> {
        self.mutate(
            Method::PUT,
            &format!("transactions/{id}"),
            Some(payload),
            Collection::Transactions,
        )
        .await
    }

    pub async fn delete_transaction(&self, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("transactions/{id}"), Collection::Transactions)
            .await
    }

    pub async fn budgets(&self) -> ClientResult<BudgetListResponse> {
        self.query::<_, ()>(QueryKey::Budgets, "budgets", None)
            .await
    }

    pub async fn budget(&self, id: Uuid) -> ClientResult<BudgetView> {
        self.query::<_, ()>(QueryKey::Budget(id), &format!("budgets/{id}"), None)
            .await
    }

    pub async fn create_budget(&self, payload: &BudgetNew) -> ClientResult<BudgetView> {
        self.mutate(Method::POST, "budgets", Some(payload), Collection::Budgets)
            .await
    }

    pub async fn update_budget(&self, id: Uuid, payload: &BudgetUpdate) -> ClientResult<BudgetView> {
        self.mutate(
            Method::PUT,
            &format!("budgets/{id}"),
            Some(payload),
            Collection::Budgets,
        )
        .await
    }

    pub async fn delete_budget(&self, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("budgets/{id}"), Collection::Budgets)
            .await
    }

    pub async fn pots(&self) -> ClientResult<PotListResponse> {
        self.query::<_, ()>(QueryKey::Pots, "pots", None).await
    }

    pub async fn pot(&self, id: Uuid) -> ClientResult<PotView> {
        self.query::<_, ()>(QueryKey::Pot(id), &format!("pots/{id}"), None)
            .await
    }

    pub async fn create_pot(&self, payload: &PotInput) -> ClientResult<PotView> {
        self.mutate(Method::POST, "pots", Some(payload), Collection::Pots)
            .await
    }

    pub async fn update_pot(&self, id: Uuid, payload: &PotInput) -> ClientResult<PotView> {
        self.mutate(
            Method::PUT,
            &format!("pots/{id}"),
            Some(payload),
            Collection::Pots,
        )
        .await
    }

    pub async fn delete_pot(&self, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("pots/{id}"), Collection::Pots).await
    }

    pub async fn deposit(&self, id: Uuid, amount_minor: i64) -> ClientResult<PotView> {
        self.mutate(
            Method::POST,
            &format!("pots/{id}/deposit"),
            Some(&PotMove { amount_minor }),
            Collection::Pots,
        )
        .await
    }

    pub async fn withdraw(&self, id: Uuid, amount_minor: i64) -> ClientResult<PotView> {
        self.mutate(
            Method::POST,
            &format!("pots/{id}/withdraw"),
            Some(&PotMove { amount_minor }),
            Collection::Pots,
        )
        .await
    }
}


/// Runs the client against the real router on a local port.
#[cfg(test)]
mod server_tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use super::*;

    const PASSWORD: &str = "Secret123";

    async fn spawn_server() -> String {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let engine = engine::Engine::builder()
            .database(db)
            .password_cost(4)
            .build()
            .await
            .unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(server::run_with_listener(engine, listener));
        format!("http://{addr}/")
    }

    async fn logged_in(base_url: &str) -> Client {
        let anonymous = Client::new(base_url).unwrap();
        anonymous
            .register(&Register {
                email: "alice@example.com".to_string(),
                password: PASSWORD.to_string(),
                first_name: "Alice".to_string(),
                last_name: "Smith".to_string(),
            })
            .await
            .unwrap();
        login(base_url).await
    }

    async fn login(base_url: &str) -> Client {
        let anonymous = Client::new(base_url).unwrap();
        let session = anonymous
            .login(&Login {
                email: "alice@example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();
        anonymous.with_token(Some(session.token))
    }

    #[tokio::test]
    async fn pot_is_refetched_after_own_deposit() {
        let base_url = spawn_server().await;
        let client = logged_in(&base_url).await;
        let other = login(&base_url).await;

        let pot = client
            .create_pot(&PotInput {
                name: "Holiday".to_string(),
                goal_minor: 100_00,
                current_minor: 0,
                theme: None,
            })
            .await
            .unwrap();
        assert_eq!(client.pot(pot.id).await.unwrap().current_minor, 0);

        // A write made elsewhere is not seen while the read is cached.
        other.deposit(pot.id, 10_00).await.unwrap();
        assert_eq!(client.pot(pot.id).await.unwrap().current_minor, 0);

        let deposited = client.deposit(pot.id, 5_00).await.unwrap();
        assert_eq!(deposited.current_minor, 15_00);
        let reread = client.pot(pot.id).await.unwrap();
        assert_eq!(reread.current_minor, 15_00);
        assert_eq!(reread.remaining_minor, 85_00);
    }

    #[tokio::test]
    async fn failed_deposit_names_the_headroom() {
        let base_url = spawn_server().await;
        let client = logged_in(&base_url).await;
        let pot = client
            .create_pot(&PotInput {
                name: "Laptop".to_string(),
                goal_minor: 100_00,
                current_minor: 90_00,
                theme: None,
            })
            .await
            .unwrap();

        let err = client.deposit(pot.id, 20_00).await.unwrap_err();
        assert!(matches!(&err, ClientError::Validation(msg) if msg.contains("$10.00")));
        assert_eq!(client.pot(pot.id).await.unwrap().current_minor, 90_00);
    }

    #[tokio::test]
    async fn wrong_password_is_a_rejected_login() {
        let base_url = spawn_server().await;
        logged_in(&base_url).await;

        let err = Client::new(&base_url)
            .unwrap()
            .login(&Login {
                email: "alice@example.com".to_string(),
                password: "Wrong1234".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(&err, ClientError::Credentials(_)));
        assert_eq!(err.user_message(), "invalid email or password");
    }

    #[tokio::test]
    async fn unknown_token_reads_as_an_expired_session() {
        let base_url = spawn_server().await;
        let client = Client::new(&base_url)
            .unwrap()
            .with_token(Some("not-a-session".to_string()));

        let err = client.pots().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
    }
}
