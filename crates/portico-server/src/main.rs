//! Portico CLI
//!
//! Runs the portal server and administers its configuration.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use portico_server::cli::{Cli, Command, TokenAction};
use portico_server::config_handlers::handle_config_command;
use portico_server::{commands, ConfigManager, PorticoConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else {
        "info,portico=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Serve { host, port } => {
            let mut config = PorticoConfig::load(config_path)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            Server::new(config)?.run().await?;
        }
        Command::Config { action } => handle_config_command(config_path, action)?,
        Command::Matrix { role } => commands::cmd_matrix(config_path, role)?,
        Command::Token { action } => match action {
            TokenAction::Issue { subject, role } => {
                commands::cmd_token_issue(config_path, &subject, role)?
            }
            TokenAction::Inspect { token } => commands::cmd_token_inspect(&token)?,
        },
    }

    Ok(())
}
