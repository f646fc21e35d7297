//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod config_cmd;
pub mod service_actions;
pub mod services;
pub mod util;

use mockctl_core::Admin;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, admin: &Admin, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Services(args) => services::handle(admin, args, global).await,
        Command::ServiceActions(args) => service_actions::handle(admin, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
