//! Operator user endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use digibank_core::domain::UserSummary;
use digibank_core::services::{NewUser, PasswordChange, UserUpdate};

use super::error::{AppError, AppResult};
use super::listing::{CollectionBody, ListParams};
use super::state::AppState;

const NOT_FOUND: &str = "User not found";

fn user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(NOT_FOUND))
}

pub async fn list_users(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<CollectionBody<UserSummary>>> {
    let Query(params) = params?;
    let query = params.into_query(state.ctx.config.listing.default_page_size)?;
    let page = state
        .blocking(move |ctx| ctx.user_service.list(&query))
        .await?;
    Ok(Json(CollectionBody::from_page(page, NOT_FOUND)?))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(request) = payload?;
    let user = state
        .blocking(move |ctx| ctx.user_service.create(&request))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "data": UserSummary::from(&user),
        })),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserSummary>> {
    let id = user_id(&id)?;
    let user = state.blocking(move |ctx| ctx.user_service.get(id)).await?;
    Ok(Json(UserSummary::from(&user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = user_id(&id)?;
    let Json(request) = payload?;
    let user = state
        .blocking(move |ctx| ctx.user_service.update(id, &request))
        .await?;

    Ok(Json(json!({
        "message": "User changed successfully",
        "data": UserSummary::from(&user),
    })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = user_id(&id)?;
    let user = state.blocking(move |ctx| ctx.user_service.delete(id)).await?;

    Ok(Json(json!({
        "message": "User deleted successfully",
        "data": UserSummary::from(&user),
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = user_id(&id)?;
    let Json(request) = payload?;
    state
        .blocking(move |ctx| ctx.user_service.change_password(id, &request))
        .await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
