//! Registration and login handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;

use account_service_lib::token::TokenResponse;
use common::AppResult;

use crate::extractors::JsonBody;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    /// Display name
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    state
        .accounts
        .register(payload.username, payload.name, payload.email, payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("registration_successful")),
    ))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let token = state
        .accounts
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(token, "login_successful")))
}
