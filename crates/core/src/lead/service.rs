//! Lead lifecycle service
//!
//! Every mutation entry point persists first and then runs the notification
//! fan-out. Fan-out failures are logged; they never undo or fail the
//! mutation.

use std::sync::Arc;

use tracing::{debug, info, warn};
use tripdesk_common::Clock;
use tripdesk_domain::{
    attachment_key, Attachment, AttachmentStorage, Lead, LeadChanges, LeadDraft,
    LeadStatus, Result, ServiceStatuses, TripDeskError,
};
use uuid::Uuid;

use super::ports::{AttachmentRepository, AttachmentStore, LeadRepository};
use super::reference;
use crate::notification::{NotificationDispatcher, NotificationPlanner};

const REFERENCE_ATTEMPTS: usize = 5;

pub struct LeadService {
    leads: Arc<dyn LeadRepository>,
    attachments: Arc<dyn AttachmentRepository>,
    store: Arc<dyn AttachmentStore>,
    planner: Arc<NotificationPlanner>,
    dispatcher: Arc<NotificationDispatcher>,
    clock: Arc<dyn Clock>,
}

impl LeadService {
    pub fn new(
        leads: Arc<dyn LeadRepository>,
        attachments: Arc<dyn AttachmentRepository>,
        store: Arc<dyn AttachmentStore>,
        planner: Arc<NotificationPlanner>,
        dispatcher: Arc<NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { leads, attachments, store, planner, dispatcher, clock }
    }

    pub async fn find(&self, id: Uuid) -> Result<Lead> {
        self.leads.find_by_id(id).await?.ok_or_else(|| TripDeskError::not_found("lead", id))
    }

    /// Create a lead in status `new` with every service pending.
    pub async fn create(&self, draft: LeadDraft, actor: Uuid) -> Result<Lead> {
        if draft.customer_name.trim().is_empty() {
            return Err(TripDeskError::Validation("Customer name is required.".to_string()));
        }

        let now = self.clock.now();
        let lead = Lead {
            id: Uuid::new_v4(),
            reference: self.next_reference().await?,
            customer_name: draft.customer_name.trim().to_string(),
            contact_method: draft.contact_method,
            contact_value: draft.contact_value,
            platform: draft.platform,
            destination: draft.destination,
            travel_start: draft.travel_start,
            travel_end: draft.travel_end,
            adults: draft.adults,
            children: draft.children,
            infants: draft.infants,
            status: LeadStatus::New.into(),
            priority: draft.priority,
            services: ServiceStatuses::default(),
            assigned_to: draft.assigned_to,
            assigned_operator: draft.assigned_operator,
            created_by: actor,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.leads.insert(&lead).await?;
        info!(lead_id = %lead.id, reference = %lead.reference, created_by = %actor, "Lead created");

        self.fan_out(None, &lead).await;
        Ok(lead)
    }

    /// Apply `changes` and notify about whatever actually changed.
    pub async fn update(&self, id: Uuid, changes: LeadChanges, actor: Uuid) -> Result<Lead> {
        let old = self.find(id).await?;
        let new = changes.apply_to(&old, self.clock.now());

        self.leads.update(&new).await?;
        info!(lead_id = %id, actor = %actor, status = %new.status, "Lead updated");

        self.fan_out(Some(&old), &new).await;
        Ok(new)
    }

    /// Manual terminal action; refused when the lead already has that
    /// status.
    pub async fn mark_document_upload_complete(&self, id: Uuid, actor: Uuid) -> Result<Lead> {
        let lead = self.find(id).await?;
        if lead.status.is(LeadStatus::DocumentUploadComplete) {
            return Err(TripDeskError::Validation(format!(
                "Lead {} is already marked as document upload complete.",
                lead.reference
            )));
        }
        self.update(id, LeadChanges::status(LeadStatus::DocumentUploadComplete), actor).await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        if self.leads.soft_delete(id, self.clock.now()).await? {
            info!(lead_id = %id, "Lead soft-deleted");
            Ok(())
        } else {
            Err(TripDeskError::not_found("lead", id))
        }
    }

    /// Store a file under the lead's namespace and record it.
    pub async fn attach_file(&self, id: Uuid, name: &str, bytes: Vec<u8>) -> Result<Attachment> {
        let lead = self.find(id).await?;
        let now = self.clock.now();
        let key = attachment_key(&lead.reference, now, name);

        let size_bytes = self.store.put(&key, bytes).await?;
        let attachment = Attachment {
            id: Uuid::new_v4(),
            lead_id: lead.id,
            original_name: name.to_string(),
            path: key,
            storage: AttachmentStorage::Local,
            size_bytes,
            created_at: now,
        };
        self.attachments.insert(&attachment).await?;

        info!(lead_id = %id, path = %attachment.path, size_bytes, "Attachment stored");
        Ok(attachment)
    }

    pub async fn attachments(&self, id: Uuid) -> Result<Vec<Attachment>> {
        self.attachments.list_for_lead(id).await
    }

    async fn next_reference(&self) -> Result<String> {
        let today = self.clock.today();
        for _ in 0..REFERENCE_ATTEMPTS {
            let candidate = reference::generate(today);
            if !self.leads.reference_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!(reference = %candidate, "Lead reference collision, retrying");
        }
        Err(TripDeskError::Internal("Could not allocate a unique lead reference".to_string()))
    }

    async fn fan_out(&self, old: Option<&Lead>, new: &Lead) {
        let intents = self.planner.on_lead_mutated(old, new).await;
        if intents.is_empty() {
            return;
        }

        let report = self.dispatcher.deliver(intents).await;
        if report.failed > 0 {
            warn!(lead_id = %new.id, delivered = report.delivered, failed = report.failed, "Some lead notifications were not delivered");
        } else {
            debug!(lead_id = %new.id, delivered = report.delivered, "Lead notifications delivered");
        }
    }
}
