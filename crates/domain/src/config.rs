//! Configuration structures
//!
//! Loading lives in `tripdesk_infra::config`; these are the plain serde
//! shapes shared by every layer.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APP_URL, DEFAULT_ATTACHMENTS_ROOT, DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE,
    DEFAULT_LEGACY_ATTACHMENTS_ROOT,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub attachments: AttachmentsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

/// Where attachment bytes are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentsConfig {
    pub root: String,
    /// Source directory for `migrate-attachments`.
    #[serde(default = "default_legacy_root")]
    pub legacy_root: String,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ATTACHMENTS_ROOT.to_string(),
            legacy_root: DEFAULT_LEGACY_ATTACHMENTS_ROOT.to_string(),
        }
    }
}

fn default_legacy_root() -> String {
    DEFAULT_LEGACY_ATTACHMENTS_ROOT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Base URL used to build "view lead" action links.
    pub app_url: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { app_url: DEFAULT_APP_URL.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingConfig {
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self { cache_enabled: true }
    }
}

fn default_true() -> bool {
    true
}
