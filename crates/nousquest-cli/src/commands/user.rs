//! Account lockout and permission inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use nousquest_core::error::AppError;
use nousquest_database::{CredentialStore, PermissionGraphStore, Stores};
use nousquest_entity::user::User;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List locked accounts
    Locked,
    /// Clear the lockout flag and failed-attempt counter
    Unlock {
        /// Account email
        email: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Show the roles and permissions an account holds
    Permissions {
        /// Account email
        email: String,
    },
}

/// Locked account row for table output
#[derive(Debug, Serialize, Tabled)]
struct LockedRow {
    /// Email
    email: String,
    /// Organization ID
    org_id: String,
    /// Failed attempts
    attempts: i32,
    /// Last successful login
    last_logon: String,
}

/// Permission row for table output
#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    /// Resource
    resource: String,
    /// Action
    action: String,
}

/// Execute user commands
pub async fn execute(args: &UserArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let stores = super::connect(&config).await?;

    match &args.command {
        UserCommand::Locked => {
            let rows: Vec<LockedRow> = stores
                .credentials
                .list_locked()
                .await?
                .iter()
                .map(|u| LockedRow {
                    email: u.email.clone(),
                    org_id: u.org_id.to_string(),
                    attempts: u.logon_attempt,
                    last_logon: u
                        .last_logon
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "never".to_string()),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::Unlock { email, force } => {
            let user = find_user(&stores, email).await?;

            if !user.is_locked() {
                output::print_warning(&format!("User '{}' is not locked", email));
                return Ok(());
            }

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Unlock '{}' after {} failed attempts?",
                        email, user.logon_attempt
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            if !stores.credentials.clear_lockout(user.id, user.org_id).await? {
                return Err(AppError::not_found(format!("User '{}' not found", email)));
            }
            tracing::info!(
                target: "security",
                user_id = %user.id,
                org_id = %user.org_id,
                "Account unlocked by administrator"
            );
            output::print_success(&format!("User '{}' unlocked", email));
        }
        UserCommand::Permissions { email } => {
            let user = find_user(&stores, email).await?;

            let roles = stores
                .permissions
                .list_role_names(user.id, user.org_id)
                .await?;
            if format == OutputFormat::Table {
                println!("Roles: {}", roles.join(", "));
            }

            let rows: Vec<PermissionRow> = stores
                .permissions
                .list_permissions(user.id, user.org_id)
                .await?
                .into_iter()
                .map(|p| PermissionRow {
                    resource: p.resource,
                    action: p.action,
                })
                .collect();

            output::print_list(&rows, format);
        }
    }

    Ok(())
}

async fn find_user(stores: &Stores, email: &str) -> Result<User, AppError> {
    stores
        .credentials
        .find_by_identifier(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{}' not found", email)))
}
