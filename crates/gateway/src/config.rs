//! Gateway configuration.

use account_service_lib::AccountServiceConfig;
use common::{ConfigError, ServerConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP listener binding
    pub server: ServerConfig,
    /// Database and token settings for the embedded account service
    pub accounts: AccountServiceConfig,
}

impl GatewayConfig {
    /// Combine the listener binding with account settings from the environment.
    pub fn from_env(server: ServerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            server,
            accounts: AccountServiceConfig::from_env()?,
        })
    }
}
