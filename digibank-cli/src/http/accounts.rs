//! Bank account endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use digibank_core::domain::{AccountSummary, BalanceView};
use digibank_core::services::{AccountUpdate, NewAccount, PasswordChange, Payment, Transfer};
use digibank_core::Account;

use super::error::{AppError, AppResult};
use super::listing::{CollectionBody, ListParams};
use super::state::AppState;

const NOT_FOUND: &str = "Bank Account not found";

#[derive(Debug, Serialize)]
pub struct AccountBody {
    pub id: String,
    pub owner_name: String,
    pub account_number: String,
    pub bank: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountBody {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            owner_name: account.owner_name,
            account_number: account.account_number,
            bank: account.bank,
            balance: account.balance,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PasswordBody {
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DepositBody {
    pub amount: Option<Decimal>,
}

fn account_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(NOT_FOUND))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<CollectionBody<AccountSummary>>> {
    let Query(params) = params?;
    let query = params.into_query(state.ctx.config.listing.default_page_size)?;
    let page = state
        .blocking(move |ctx| ctx.account_service.list(&query))
        .await?;
    Ok(Json(CollectionBody::from_page(page, NOT_FOUND)?))
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(request) = payload?;
    let account = state
        .blocking(move |ctx| ctx.account_service.create(&request))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created successfully",
            "data": AccountBody::from(account),
        })),
    ))
}

/// `GET /accounts/{id}` looks the account up by its account number
pub async fn get_balance(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> AppResult<Json<BalanceView>> {
    let view = state
        .blocking(move |ctx| ctx.account_service.balance(&account_number))
        .await?;
    Ok(Json(view))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AccountUpdate>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = account_id(&id)?;
    let Json(request) = payload?;
    let account = state
        .blocking(move |ctx| ctx.account_service.update(id, &request))
        .await?;

    Ok(Json(json!({
        "message": "Account changed successfully",
        "data": AccountBody::from(account),
    })))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PasswordBody>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = account_id(&id)?;
    let Json(body) = payload?;
    let account = state
        .blocking(move |ctx| ctx.account_service.delete(id, &body.password))
        .await?;

    Ok(Json(json!({
        "message": "Account deleted successfully",
        "data": AccountBody::from(account),
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = account_id(&id)?;
    let Json(request) = payload?;
    state
        .blocking(move |ctx| ctx.account_service.change_password(id, &request))
        .await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

pub async fn deposit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DepositBody>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = account_id(&id)?;
    let Json(body) = payload?;
    let change = state
        .blocking(move |ctx| ctx.account_service.deposit(id, body.amount))
        .await?;

    Ok(Json(json!({ "message": "Deposit success", "data": change })))
}

pub async fn payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Payment>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = account_id(&id)?;
    let Json(request) = payload?;
    let receipt = state
        .blocking(move |ctx| ctx.account_service.payment(id, &request))
        .await?;

    Ok(Json(json!({ "message": "Payment success", "data": receipt })))
}

pub async fn transfer(
    State(state): State<AppState>,
    Path((id, target_id)): Path<(String, String)>,
    payload: Result<Json<Transfer>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let source = account_id(&id)?;
    let target = account_id(&target_id)?;
    let Json(request) = payload?;
    let receipt = state
        .blocking(move |ctx| ctx.account_service.transfer(source, target, &request))
        .await?;

    Ok(Json(json!({ "message": "Transfer success", "data": receipt })))
}
