//! HTTP route handlers for the wallet-api REST API.
//!
//! Provides endpoints for querying a user's wallet balance, topping up the
//! wallet, and listing the wallet's transactions. Handlers perform no error
//! classification: any repository failure is reported as the same generic
//! internal-server-error payload, and nothing is written on the success path
//! when a failure occurs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::spawn_blocking;
use tower_http::cors::CorsLayer;

use crate::AppState;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

const ERR_INTERNAL: &str = "Internal server error.";
const ERR_SQLITE_UNAVAILABLE: &str = "SQLite pool unavailable.";

fn json_error(status: StatusCode, message: &'static str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

fn internal_error() -> (StatusCode, Json<Value>) {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, ERR_INTERNAL)
}

pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/users/{user_id}/wallet/balance", get(show_user_balance))
        .route("/users/{user_id}/wallet/topup", post(top_up_wallet))
        .route(
            "/users/{user_id}/wallet/transactions",
            get(list_all_transactions),
        )
        .with_state(state);

    if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

pub async fn root(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let pool = state.sqlite_pool.clone();
    spawn_blocking(move || {
        pool.get()
            .map(|_| ())
            .map_err(|err| format!("get sqlite connection: {err}"))
    })
    .await
    .map_err(|err| {
        eprintln!("failed to join sqlite task: {err}");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, ERR_SQLITE_UNAVAILABLE)
    })?
    .map_err(|err| {
        eprintln!("{err}");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, ERR_SQLITE_UNAVAILABLE)
    })?;

    Ok(Json(json!({ "status": "ok" })))
}

pub async fn show_user_balance(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let repository = state.repository.clone();
    let balance = spawn_blocking(move || repository.user_balance(user_id))
        .await
        .map_err(|err| {
            eprintln!("failed to join wallet task: {err}");
            internal_error()
        })?
        .map_err(|err| {
            eprintln!("failed to fetch balance for user {user_id}: {err}");
            internal_error()
        })?;

    Ok((StatusCode::OK, Json(json!({ "balance": balance }))))
}

#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub amount: i64,
}

// The user to credit comes from the request body, not the route segment.
pub async fn top_up_wallet(
    State(state): State<AppState>,
    Json(payload): Json<TopUpRequest>,
) -> ApiResult<impl IntoResponse> {
    let repository = state.repository.clone();
    let TopUpRequest { user_id, amount } = payload;

    let balance = spawn_blocking(move || repository.top_up(user_id, amount))
        .await
        .map_err(|err| {
            eprintln!("failed to join wallet task: {err}");
            internal_error()
        })?
        .map_err(|err| {
            eprintln!("failed to top up wallet for user {user_id}: {err}");
            internal_error()
        })?;

    Ok((StatusCode::OK, Json(json!({ "balance": balance }))))
}

pub async fn list_all_transactions(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let repository = state.repository.clone();
    let transactions = spawn_blocking(move || repository.list_transactions(user_id))
        .await
        .map_err(|err| {
            eprintln!("failed to join wallet task: {err}");
            internal_error()
        })?
        .map_err(|err| {
            eprintln!("failed to list transactions for user {user_id}: {err}");
            internal_error()
        })?;

    Ok((StatusCode::OK, Json(transactions)))
}
