//! In-app notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vocabulary::{BadgeColor, NotificationType};

/// A notification the fan-out decided to send, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub recipient_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub color: BadgeColor,
    pub icon: String,
    pub lead_id: Option<Uuid>,
    pub action_url: Option<String>,
}

/// A stored inbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub color: BadgeColor,
    pub icon: String,
    pub action_url: Option<String>,
    pub lead_id: Option<Uuid>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_intent(intent: NotificationIntent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: intent.recipient_id,
            notification_type: intent.notification_type,
            title: intent.title,
            body: intent.body,
            color: intent.color,
            icon: intent.icon,
            action_url: intent.action_url,
            lead_id: intent.lead_id,
            read_at: None,
            created_at: now,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

/// Result of delivering a batch of intents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}
