//! # portico-server
//!
//! Portal HTTP server and admin CLI for Portico.
//!
//! This crate provides:
//! - [`Server`] / [`routes::router`] - the guarded axum application
//! - [`PorticoConfig`] / [`ConfigManager`] - TOML configuration with env overrides
//! - [`UserDirectory`] and [`RecordStore`] - mock users and scoped records
//! - CLI definitions and command handlers for the `portico` binary

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod directory;
pub mod error;
pub mod records;
pub mod routes;
pub mod server;

pub use config::{ConfigManager, PorticoConfig};
pub use directory::{DirectoryUser, UserDirectory};
pub use error::{ApiError, Error, Result};
pub use records::{Record, RecordStore};
pub use routes::AppState;
pub use server::Server;
