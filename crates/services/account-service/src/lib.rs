//! Account Service Library
//!
//! Registration, login, bearer tokens and self-service profile management
//! over a SeaORM account store. The HTTP gateway embeds this crate.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
pub mod token;

use std::sync::Arc;

use tracing::info;

use crate::infra::Database;
use crate::repository::AccountStore;
use crate::service::{AccountManager, AccountService};
use crate::token::TokenService;
use common::{DatabaseConfig, JwtConfig};

pub use crate::config::AccountServiceConfig;

/// Build the account service over an open database.
pub fn build_service(db: &Database, jwt: &JwtConfig) -> Arc<dyn AccountService> {
    let repo = Arc::new(AccountStore::new(db.get_connection()));
    let tokens = Arc::new(TokenService::new(jwt));
    Arc::new(AccountManager::new(repo, tokens))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    action: MigrateAction,
    config: &DatabaseConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
