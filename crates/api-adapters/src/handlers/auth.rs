use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domains::{Credentials, Registration};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Registration>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = body?;
    let session = state.services.auth.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": session.user,
            "token": session.token,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = body?;
    let session = state.services.auth.login(input).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "user": session.user,
        "token": session.token,
    })))
}

pub async fn me(current: CurrentUser) -> Json<Value> {
    Json(json!({ "user": current.user }))
}
