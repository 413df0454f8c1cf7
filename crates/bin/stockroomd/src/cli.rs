//! Command-line flags. Every flag overrides the matching configuration key.

use std::path::PathBuf;

use clap::Parser;

use crate::config::StorageBackend;

/// Inventory service for devices and their photos.
#[derive(Parser, Debug, Default)]
#[command(name = "stockroomd", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file (default: `stockroom.toml`).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address to bind to.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// TCP port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Directory holding uploaded photos.
    #[arg(long = "cache")]
    pub cache: Option<PathBuf>,

    /// Storage backend.
    #[arg(long = "storage", value_enum)]
    pub storage: Option<StorageBackend>,

    /// sqlx connection URL of the relational backend.
    #[arg(long = "database-url")]
    pub database_url: Option<String>,
}
