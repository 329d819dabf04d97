//! Core application infrastructure

pub(crate) mod banner;
pub mod cli;
pub mod config;
pub mod constants;
pub mod shutdown;
pub mod storage;

pub use crate::app::CoreApp;
pub use config::AppConfig;
pub use shutdown::ShutdownService;
pub use storage::AppStorage;
