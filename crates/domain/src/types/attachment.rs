//! Lead attachments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_domain_status_conversions;

/// Backend an attachment's bytes currently live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentStorage {
    /// Pre-migration location under the legacy root.
    Legacy,
    /// The configured attachment store.
    Local,
}

impl_domain_status_conversions!(AttachmentStorage {
    Legacy => "legacy",
    Local => "local",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub original_name: String,
    /// Store-relative key, `leads/<reference>/<timestamp>_<name>`.
    pub path: String,
    pub storage: AttachmentStorage,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Keep ASCII alphanumerics, dot, dash and underscore; everything else
/// becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Storage key for a lead attachment.
pub fn attachment_key(reference: &str, timestamp: DateTime<Utc>, name: &str) -> String {
    format!("leads/{}/{}_{}", reference, timestamp.format("%Y%m%d%H%M%S"), sanitize_file_name(name))
}
