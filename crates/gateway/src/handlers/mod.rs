//! HTTP handlers.

mod auth_handler;
mod health_handler;
mod profile_handler;

pub use auth_handler::{auth_routes, LoginRequest, RegisterRequest};
pub use health_handler::{health_check, HealthResponse};
pub use profile_handler::{
    profile_routes, ChangePasswordRequest, DeleteAccountRequest, UpdateProfileRequest,
};
