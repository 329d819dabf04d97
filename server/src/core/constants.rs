//! Application-wide constants
//!
//! Every environment variable name, default, and limit lives here so the
//! rest of the codebase never hard-codes them.

/// Application name for display
pub const APP_NAME: &str = "OrgLens";

/// Application name, lowercase (log filters, paths)
pub const APP_NAME_LOWER: &str = "orglens";

/// Local fallback data folder when no platform directory is available
pub const APP_DOT_FOLDER: &str = ".orglens";

// =============================================================================
// Environment variables
// =============================================================================

pub const ENV_LOG: &str = "ORGLENS_LOG";
pub const ENV_HOST: &str = "ORGLENS_HOST";
pub const ENV_PORT: &str = "ORGLENS_PORT";
pub const ENV_DATA_DIR: &str = "ORGLENS_DATA_DIR";
pub const ENV_WAREHOUSE_BACKEND: &str = "ORGLENS_WAREHOUSE_BACKEND";
pub const ENV_POSTGRES_URL: &str = "ORGLENS_POSTGRES_URL";
pub const ENV_SOURCE_TABLE: &str = "ORGLENS_SOURCE_TABLE";

// =============================================================================
// Server defaults
// =============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8420;

/// Default request body limit (1MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Directory / filter engine
// =============================================================================

/// Warehouse table the directory snapshot is loaded from
pub const DEFAULT_SOURCE_TABLE: &str = "personnel";

/// Sentinel value meaning "no selection" for a hierarchical selector
pub const UNCONSTRAINED: &str = "All";

/// Maximum rows a result may have and still be rendered; above this the
/// count is reported with a refine-search prompt instead
pub const MAX_RESULT_ROWS: usize = 100_000;

/// Maximum search terms per field search
pub const MAX_SEARCH_TERMS: usize = 3;

/// Maximum length of a single search term
pub const MAX_TERM_LENGTH: usize = 256;

/// Maximum length of a warehouse table identifier
pub const MAX_TABLE_NAME_LENGTH: usize = 64;

// =============================================================================
// Warehouse
// =============================================================================

pub const SQLITE_DB_FILENAME: &str = "warehouse.db";
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;

pub const POSTGRES_MAX_CONNECTIONS: u32 = 5;
pub const POSTGRES_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Rows per multi-value INSERT when persisting a filtered subset
pub const SAVE_INSERT_BATCH: usize = 500;

// =============================================================================
// Shutdown
// =============================================================================

pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
