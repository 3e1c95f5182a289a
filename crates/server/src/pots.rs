//! Pots API endpoints

use api_types::pot::{PotInput, PotListResponse, PotMove, PotView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{MoneyCents, Pot, PotCmd, User};

use crate::{ServerError, parse_id, server::ServerState};

fn view(pot: Pot) -> PotView {
    PotView {
        id: pot.id,
        remaining_minor: pot.remaining().cents(),
        name: pot.name,
        goal_minor: pot.goal.cents(),
        current_minor: pot.current.cents(),
        theme: pot.theme.to_string(),
    }
}

fn cmd(input: PotInput) -> PotCmd {
    let cmd = PotCmd::new(input.name, MoneyCents::new(input.goal_minor))
        .current(MoneyCents::new(input.current_minor));
    match input.theme {
        Some(theme) => cmd.theme(theme),
        None => cmd,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<PotListResponse>, ServerError> {
    let pots = state
        .engine
        .list_pots(user.id)
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(PotListResponse { pots }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<PotView>, ServerError> {
    let pot = state.engine.pot(user.id, parse_id(&id)?).await?;
    Ok(Json(view(pot)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<PotInput>,
) -> Result<(StatusCode, Json<PotView>), ServerError> {
    let pot = state.engine.create_pot(user.id, cmd(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(pot))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PotInput>,
) -> Result<Json<PotView>, ServerError> {
    let pot = state
        .engine
        .update_pot(user.id, parse_id(&id)?, cmd(payload))
        .await?;
    Ok(Json(view(pot)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_pot(user.id, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for adding money to a pot, bounded by its goal
pub async fn deposit(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PotMove>,
) -> Result<Json<PotView>, ServerError> {
    let pot = state
        .engine
        .deposit_pot(user.id, parse_id(&id)?, MoneyCents::new(payload.amount_minor))
        .await?;
    Ok(Json(view(pot)))
}

/// Handle requests for taking money out of a pot, bounded by its balance
pub async fn withdraw(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PotMove>,
) -> Result<Json<PotView>, ServerError> {
    let pot = state
        .engine
        .withdraw_pot(user.id, parse_id(&id)?, MoneyCents::new(payload.amount_minor))
        .await?;
    Ok(Json(view(pot)))
}
