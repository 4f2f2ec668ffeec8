//! Command handlers.

pub mod ip;
pub mod list;
pub mod update;

use anyhow::Result;
use dyndns_core::DyndnsConfig;

use crate::cli::Command;

/// Run one subcommand to completion
pub async fn dispatch(command: Command, config: &DyndnsConfig) -> Result<()> {
    match command {
        Command::List => list::handle(config).await,
        Command::Update(args) => update::handle(config, args).await,
        Command::Ip => ip::handle(config).await,
    }
}
