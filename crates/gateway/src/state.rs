//! Application state for dependency injection.

use std::sync::Arc;

use account_service_lib::service::AccountService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountService>,
}

impl AppState {
    /// Create new app state.
    pub fn new(accounts: Arc<dyn AccountService>) -> Self {
        Self { accounts }
    }
}
