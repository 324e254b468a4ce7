//! Catalog routes. Reads are public; every mutation requires an Admin.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{Game, GameDetail, GameFilter, GamePatch, NewGame};
use serde_json::{json, Value};
use services::access;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "message": "Game bulletin API is running" }))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<GameFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Game>>> {
    let Query(filter) = query?;
    Ok(Json(state.services.catalog.list(filter).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<GameDetail>> {
    let Path(id) = path?;
    Ok(Json(state.services.catalog.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    body: Result<Json<NewGame>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    access::ensure_admin(&current.caller)?;
    let Json(input) = body?;
    let game = state.services.catalog.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Game created successfully", "game": game })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<GamePatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    access::ensure_admin(&current.caller)?;
    let Path(id) = path?;
    let Json(patch) = body?;
    let game = state.services.catalog.update(id, patch).await?;
    Ok(Json(json!({ "message": "Game updated successfully", "game": game })))
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Value>> {
    access::ensure_admin(&current.caller)?;
    let Path(id) = path?;
    state.services.catalog.delete(id).await?;
    Ok(Json(json!({ "message": "Game deleted successfully" })))
}
