//! Account service configuration.

use common::{ConfigError, DatabaseConfig, JwtConfig};

/// Account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails when `JWT_SECRET` is absent or too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env()?,
        })
    }
}
