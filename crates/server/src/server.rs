use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use engine::{Engine, EngineError};

use std::sync::Arc;

use crate::{ServerError, auth, budgets, overview, pots, transactions};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Bearer token of the request, kept for logout.
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

/// Resolves `Authorization: Bearer <token>` to a user and stores it, with
/// the token, in the request extensions.
async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(header) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(EngineError::Unauthorized("missing bearer token".to_string()).into());
    };

    let token = header.token().to_string();
    let user = state.engine.authenticate_session(&token).await?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            get(budgets::get).put(budgets::update).delete(budgets::delete),
        )
        .route("/pots", get(pots::list).post(pots::create))
        .route(
            "/pots/{id}",
            get(pots::get).put(pots::update).delete(pots::delete),
        )
        .route("/pots/{id}/deposit", post(pots::deposit))
        .route("/pots/{id}/withdraw", post(pots::withdraw))
        .route("/overview", get(overview::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}

/// Binds `addr` and serves until the listener fails.
pub async fn run(engine: Engine, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(engine))).await
}
