//! Infrastructure layer constants

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Environment variable prefix; nested keys are separated by `__`
pub const CONFIG_ENV_PREFIX: &str = "GEOCACHE";

/// Separator between the prefix and nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "geocache.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "geocache";

// ============================================================================
// LOGGING
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "GEOCACHE_LOG";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "geocache";

// ============================================================================
// TRANSPORT AND LIFECYCLE
// ============================================================================

/// Pause before a crashed delivery worker is restarted, in milliseconds
pub const DEFAULT_RESTART_BACKOFF_MS: u64 = 250;

/// Grace period for delivery workers on shutdown, in seconds
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;
