use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{DomainError, FavoriteWithGame};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavorite {
    #[serde(default)]
    pub game_id: Option<Uuid>,
}

pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<FavoriteWithGame>>> {
    Ok(Json(
        state.services.favorites.list(current.caller.user_id).await?,
    ))
}

pub async fn add(
    State(state): State<AppState>,
    current: CurrentUser,
    body: Result<Json<AddFavorite>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = body?;
    let game_id = input
        .game_id
        .ok_or_else(|| DomainError::validation("gameId is required"))?;
    let favorite = state
        .services
        .favorites
        .add(current.caller.user_id, game_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Game added to favorites", "favorite": favorite })),
    ))
}

/// Removing a game that is not a favorite still succeeds.
pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(game_id) = path?;
    state
        .services
        .favorites
        .remove(current.caller.user_id, game_id)
        .await?;
    Ok(Json(json!({ "message": "Game removed from favorites" })))
}
