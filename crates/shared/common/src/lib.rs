//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Transport-facing error type with HTTP status mapping
//! - Configuration structures loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
