use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{NewReview, ReviewPatch, ReviewWithAuthor};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::AppState;

pub async fn list_by_game(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<ReviewWithAuthor>>> {
    let Path(game_id) = path?;
    Ok(Json(state.services.reviews.list_by_game(game_id).await?))
}

/// The author is always the caller, whatever the body says.
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    body: Result<Json<NewReview>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = body?;
    let review = state
        .services
        .reviews
        .create(current.caller.user_id, input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Review added successfully", "review": review })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ReviewPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    let Json(patch) = body?;
    let review = state
        .services
        .reviews
        .update(id, &current.caller, patch)
        .await?;
    Ok(Json(json!({ "message": "Review updated successfully", "review": review })))
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    state.services.reviews.delete(id, &current.caller).await?;
    Ok(Json(json!({ "message": "Review deleted successfully" })))
}
