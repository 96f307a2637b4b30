//! Self-service profile handlers. All routes require a bearer token.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use common::AppResult;
use domain::{AccountProfile, ProfileUpdate};

use crate::extractors::JsonBody;
use crate::middleware::CurrentAccount;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Profile update request. Absent or empty fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            username: request.username,
            display_name: request.name,
            email: request.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_profile).put(update_profile).delete(delete_account),
        )
        .route("/change-password", put(change_password))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<Json<ApiResponse<AccountProfile>>> {
    let profile = state.accounts.get_profile(current.id).await?;
    Ok(Json(ApiResponse::with_message(profile, "profile_found")))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<AccountProfile>>> {
    let profile = state
        .accounts
        .update_profile(current.id, payload.into())
        .await?;
    Ok(Json(ApiResponse::with_message(profile, "profile_updated")))
}

/// Delete the caller's account after re-checking the password
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    JsonBody(payload): JsonBody<DeleteAccountRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .accounts
        .delete_account(current.id, payload.password)
        .await?;
    Ok(Json(ApiResponse::message("profile_deleted")))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .accounts
        .change_password(
            current.id,
            payload.old_password,
            payload.new_password,
            payload.confirm_new_password,
        )
        .await?;
    Ok(Json(ApiResponse::message("password_changed")))
}
