use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use digibank_core::services::Credentials;

use super::error::AppResult;
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub name: String,
    pub user_id: String,
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(credentials) = payload?;
    let user = state
        .blocking(move |ctx| ctx.auth_service.login(&credentials))
        .await?;
    let token = state.tokens.issue(&user)?;

    Ok(Json(LoginResponse {
        email: user.email,
        name: user.name,
        user_id: user.id.to_string(),
        token,
    }))
}
