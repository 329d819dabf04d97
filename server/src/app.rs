//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::WarehouseService;
use crate::domain::directory::Snapshot;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub warehouse: Arc<WarehouseService>,
    pub snapshot: Arc<Snapshot>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;

        let warehouse = Arc::new(
            WarehouseService::init(&config, &storage)
                .await
                .context("Failed to initialize warehouse")?,
        );
        tracing::debug!(backend = warehouse.backend_name(), "Warehouse initialized");

        // The directory is loaded once; a source table that cannot be read
        // or does not match the expected schema is fatal at startup.
        let snapshot = warehouse
            .load_snapshot(&config.warehouse.source_table)
            .await
            .with_context(|| {
                format!(
                    "Failed to load directory from table '{}'",
                    config.warehouse.source_table
                )
            })?;
        let snapshot = Arc::new(snapshot);

        let shutdown = ShutdownService::new(warehouse.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            warehouse,
            snapshot,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers().await;

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            app.warehouse.backend_name(),
            &app.config.warehouse.source_table,
            app.snapshot.len(),
            &app.storage.data_dir().display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
