//! CLI command definitions and dispatch.

pub mod migrate;
pub mod user;

use clap::{Parser, Subcommand};

use nousquest_core::config::AppConfig;
use nousquest_core::error::AppError;
use nousquest_database::Stores;

use crate::output::{self, OutputFormat};

/// NousQuest administration
#[derive(Debug, Parser)]
#[command(name = "nousquest", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects config/{env}.toml)
    #[arg(short, long, env = "NOUSQUEST_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Account lockout and permission inspection
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: open the configured stores
///
/// An in-memory backend starts empty every time, so administrative changes
/// made through it are lost when the command exits.
pub async fn connect(config: &AppConfig) -> Result<Stores, AppError> {
    if config.database.is_memory() {
        output::print_warning("database.url is memory://; changes will not persist");
    }
    Stores::connect(&config.database).await
}
