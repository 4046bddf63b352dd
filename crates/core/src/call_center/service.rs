//! Call-center workflow

use std::sync::Arc;

use tracing::info;
use tripdesk_common::Clock;
use tripdesk_domain::{CallCenterCall, CallStatus, CallType, Result, TripDeskError};
use uuid::Uuid;

use super::ports::CallCenterRepository;

pub struct CallCenterService {
    calls: Arc<dyn CallCenterRepository>,
    clock: Arc<dyn Clock>,
}

impl CallCenterService {
    pub fn new(calls: Arc<dyn CallCenterRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { calls, clock }
    }

    pub async fn schedule(&self, lead_id: Uuid, call_type: CallType) -> Result<CallCenterCall> {
        let mut call = CallCenterCall::new(lead_id, call_type);
        call.created_at = self.clock.now();
        call.updated_at = call.created_at;
        self.calls.insert(&call).await?;
        info!(call_id = %call.id, lead_id = %lead_id, call_type = call_type.as_str(), "Call scheduled");
        Ok(call)
    }

    /// Give the call to an agent; a pending call becomes `assigned`.
    pub async fn assign(&self, call_id: Uuid, agent_id: Uuid) -> Result<CallCenterCall> {
        let mut call = self.load(call_id).await?;
        call.agent_id = Some(agent_id);
        if call.status == CallStatus::Pending {
            call.transition(CallStatus::Assigned);
        }
        call.updated_at = self.clock.now();
        self.calls.update(&call).await?;
        Ok(call)
    }

    pub async fn transition(&self, call_id: Uuid, status: CallStatus) -> Result<CallCenterCall> {
        let mut call = self.load(call_id).await?;
        call.transition(status);
        call.updated_at = self.clock.now();
        self.calls.update(&call).await?;
        info!(call_id = %call_id, status = status.as_str(), attempts = call.call_attempts, "Call status changed");
        Ok(call)
    }

    /// Tick a checklist item; the key must belong to the call type's list.
    pub async fn complete_checklist_item(
        &self,
        call_id: Uuid,
        item: &str,
    ) -> Result<CallCenterCall> {
        let mut call = self.load(call_id).await?;
        if !call.is_checklist_item(item) {
            return Err(TripDeskError::Validation(format!(
                "'{}' is not a {} checklist item.",
                item,
                call.call_type.label()
            )));
        }
        if call.call_checklist_completed.insert(item.to_string()) {
            call.updated_at = self.clock.now();
            self.calls.update(&call).await?;
        }
        Ok(call)
    }

    pub async fn calls_for_lead(&self, lead_id: Uuid) -> Result<Vec<CallCenterCall>> {
        self.calls.list_for_lead(lead_id).await
    }

    async fn load(&self, id: Uuid) -> Result<CallCenterCall> {
        self.calls.find_by_id(id).await?.ok_or_else(|| TripDeskError::not_found("call", id))
    }
}
