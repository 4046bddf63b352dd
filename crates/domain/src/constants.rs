//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Leave budgets (days per calendar year)
pub const CASUAL_LEAVE_DAYS: u32 = 7;
pub const SICK_LEAVE_DAYS: u32 = 7;
pub const ANNUAL_LEAVE_DAYS: u32 = 14;
pub const TOTAL_LEAVE_DAYS: u32 = 28;

// Lead references: LD-YYYYMMDD-XXXX
pub const LEAD_REFERENCE_PREFIX: &str = "LD";
pub const LEAD_REFERENCE_SUFFIX_LEN: usize = 4;

// Notification presentation
pub const ICON_ASSIGNMENT: &str = "heroicon-o-user-plus";
pub const ICON_STATUS_CHANGE: &str = "heroicon-o-arrow-path";
pub const ICON_NEW_LEAD: &str = "heroicon-o-sparkles";
pub const ICON_SERVICE_STATUS: &str = "heroicon-o-clipboard-document-check";
pub const ICON_OPERATIONS_READY: &str = "heroicon-o-briefcase";

// Reporting
pub const CONVERSION_RATE_SCALE: u32 = 2;

// Configuration defaults
pub const DEFAULT_DB_PATH: &str = "tripdesk.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 8;
pub const DEFAULT_ATTACHMENTS_ROOT: &str = "storage/attachments";
pub const DEFAULT_LEGACY_ATTACHMENTS_ROOT: &str = "storage/app/public";
pub const DEFAULT_APP_URL: &str = "http://localhost:8000/admin";
