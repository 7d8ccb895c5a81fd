//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use portico_rbac::Role;

/// Portico - role-based portal server
#[derive(Parser, Debug)]
#[command(name = "portico", version)]
#[command(about = "Role-based ERP portal server and admin tool", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the portal server
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Inspect or edit the configuration file
    Config {
        /// Config operation
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the permission matrix
    Matrix {
        /// Show a single role
        #[arg(long)]
        role: Option<Role>,
    },

    /// Issue or inspect session tokens
    Token {
        /// Token operation
        #[command(subcommand)]
        action: TokenAction,
    },
}

/// `portico config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Get a value by dotted key (e.g. `server.port`)
    Get {
        /// Dotted key
        key: String,
    },
    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value; bools and numbers are detected
        value: String,
    },
    /// Write a default config file
    Init {
        /// Destination (defaults to the platform config path)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print overridable settings as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

/// `portico token` subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Issue a token for a subject and role
    Issue {
        /// Subject id
        #[arg(long)]
        subject: String,
        /// Role to grant
        #[arg(long)]
        role: Role,
    },
    /// Decode a token without checking expiry
    Inspect {
        /// Token to decode
        token: String,
    },
}
