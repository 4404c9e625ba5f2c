//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod ip;
pub mod rules;
pub mod sync;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::config::RunSettings;
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    settings: &RunSettings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sync => sync::handle(settings, global).await,
        Command::Watch(args) => watch::handle(args, settings, global).await,
        Command::Rules => rules::handle(settings, global).await,
        // Config, Ip, and Completions are handled before dispatch
        Command::Config(_) | Command::Ip | Command::Completions(_) => unreachable!(),
    }
}
