//! Single delivery routine for notification intents

use std::sync::Arc;

use tracing::{debug, error};
use tripdesk_common::Clock;
use tripdesk_domain::{DeliveryReport, Notification, NotificationIntent};

use super::ports::NotificationStore;

pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
    clock: Arc<dyn Clock>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn NotificationStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Store one notification per intent.
    ///
    /// A failed store is logged and counted; remaining intents are still
    /// delivered.
    pub async fn deliver(&self, intents: Vec<NotificationIntent>) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for intent in intents {
            let lead_id = intent.lead_id;
            let recipient_id = intent.recipient_id;
            let notification_type = intent.notification_type;
            let notification = Notification::from_intent(intent, self.clock.now());

            match self.store.store(&notification).await {
                Ok(()) => {
                    report.delivered += 1;
                    debug!(
                        notification_id = %notification.id,
                        recipient_id = %recipient_id,
                        notification_type = notification_type.as_str(),
                        "Notification stored"
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    error!(
                        error = %err,
                        lead_id = ?lead_id,
                        recipient_id = %recipient_id,
                        notification_type = notification_type.as_str(),
                        "Failed to deliver notification"
                    );
                }
            }
        }

        report
    }
}
