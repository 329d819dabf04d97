use clap::{Parser, Subcommand};

use super::config::WarehouseBackend;
use super::constants::{
    ENV_HOST, ENV_PORT, ENV_POSTGRES_URL, ENV_SOURCE_TABLE, ENV_WAREHOUSE_BACKEND,
};

#[derive(Parser)]
#[command(name = "orglens")]
#[command(version, about = "Personnel directory browser", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Warehouse backend (sqlite or postgres)
    #[arg(long, global = true, env = ENV_WAREHOUSE_BACKEND, value_parser = parse_warehouse_backend)]
    pub warehouse_backend: Option<WarehouseBackend>,

    /// PostgreSQL connection URL (when using postgres backend)
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Warehouse table the directory is loaded from
    #[arg(long, global = true, env = ENV_SOURCE_TABLE)]
    pub source_table: Option<String>,
}

/// Parse warehouse backend from CLI/env string
fn parse_warehouse_backend(s: &str) -> Result<WarehouseBackend, String> {
    match s.to_lowercase().as_str() {
        "sqlite" => Ok(WarehouseBackend::Sqlite),
        "postgres" | "postgresql" => Ok(WarehouseBackend::Postgres),
        _ => Err(format!(
            "Invalid warehouse backend '{}'. Valid options: sqlite, postgres",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub warehouse_backend: Option<WarehouseBackend>,
    pub postgres_url: Option<String>,
    pub source_table: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        warehouse_backend: cli.warehouse_backend,
        postgres_url: cli.postgres_url,
        source_table: cli.source_table,
    };
    (config, cli.command)
}
