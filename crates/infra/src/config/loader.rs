//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `TRIPDESK_DB_PATH` is unset, falls back to loading from file
//! 3. Searches several paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TRIPDESK_DB_PATH`: Database file path (required for env loading)
//! - `TRIPDESK_DB_POOL_SIZE`: Connection pool size
//! - `TRIPDESK_ATTACHMENTS_ROOT`: Directory for stored attachments
//! - `TRIPDESK_LEGACY_ATTACHMENTS_ROOT`: Source directory for attachment migration
//! - `TRIPDESK_APP_URL`: Base URL for notification action links
//! - `TRIPDESK_REPORT_CACHE`: Whether dashboard aggregates are memoized (true/false)

use std::path::{Path, PathBuf};

use tripdesk_domain::{
    AttachmentsConfig, Config, DatabaseConfig, NotificationsConfig, ReportingConfig, Result,
    TripDeskError,
};

const FILE_NAMES: &[&str] = &["tripdesk.toml", "tripdesk.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TripDeskError::Config` if neither source yields a valid config.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `TRIPDESK_DB_PATH` is required; every other value falls back to the
/// built-in default.
///
/// # Errors
/// Returns `TripDeskError::Config` if the database path is missing or a
/// numeric value is invalid.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let path = env_var("TRIPDESK_DB_PATH")?;
    let pool_size = match std::env::var("TRIPDESK_DB_POOL_SIZE") {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| TripDeskError::Config(format!("Invalid pool size: {e}")))?,
        Err(_) => defaults.database.pool_size,
    };

    Ok(Config {
        database: DatabaseConfig { path, pool_size },
        attachments: AttachmentsConfig {
            root: env_or("TRIPDESK_ATTACHMENTS_ROOT", defaults.attachments.root),
            legacy_root: env_or("TRIPDESK_LEGACY_ATTACHMENTS_ROOT", defaults.attachments.legacy_root),
        },
        notifications: NotificationsConfig {
            app_url: env_or("TRIPDESK_APP_URL", defaults.notifications.app_url),
        },
        reporting: ReportingConfig {
            cache_enabled: env_bool("TRIPDESK_REPORT_CACHE", defaults.reporting.cache_enabled),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations via
/// [`discover_config_paths`]. Format is chosen by file extension.
///
/// # Errors
/// Returns `TripDeskError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TripDeskError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => discover_config_paths().ok_or_else(|| {
            TripDeskError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TripDeskError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration by file extension (`.json` or `.toml`).
pub(crate) fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TripDeskError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TripDeskError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TripDeskError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory, its parent, or next
/// to the executable.
pub fn discover_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join(".."));
        dirs.insert(0, cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| TripDeskError::Config(format!("Missing required environment variable: {key}")))
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty()).unwrap_or(default)
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
