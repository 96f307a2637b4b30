//! API Gateway - HTTP entry point for account management.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use account_service_lib::{run_migrations, MigrateAction};
use common::{DatabaseConfig, ServerConfig, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "Account registration, login and profile API")]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "HOST", default_value = DEFAULT_SERVER_HOST)]
        host: String,
        #[arg(long, env = "PORT", default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },
    /// Manage the database schema
    Migrate {
        #[command(subcommand)]
        action: MigrateCommand,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateCommand {
    /// Apply pending migrations
    Up,
    /// Roll back the last migration
    Down,
    /// List migrations and whether they are applied
    Status,
    /// Drop everything and re-apply all migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = GatewayConfig::from_env(ServerConfig { host, port })?;
            gateway_lib::run_server(config).await?;
        }
        Commands::Migrate { action } => {
            run_migrations(action.into(), &DatabaseConfig::from_env()).await?;
        }
    }

    Ok(())
}
