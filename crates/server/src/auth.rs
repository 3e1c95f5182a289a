//! Registration and session endpoints

use api_types::auth::{Login, Register, Registered, SessionView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::RegisterCmd;

use crate::{
    ServerError,
    server::{ServerState, SessionToken},
};

/// Handle requests for creating a new account
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<Registered>), ServerError> {
    let user_id = state
        .engine
        .register(RegisterCmd {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(Registered { user_id })))
}

/// Handle login requests, returning a bearer token
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state
        .engine
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(SessionView {
        token: session.token,
        user_id: session.user_id,
        expires_at: session.expires_at,
    }))
}

pub async fn logout(
    Extension(token): Extension<SessionToken>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.logout(&token.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
