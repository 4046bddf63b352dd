//! Leave lifecycle: submit, edit, approve, reject, cancel

use std::sync::Arc;

use tracing::info;
use tripdesk_common::Clock;
use tripdesk_domain::{Leave, LeaveRequest, LeaveStatus, Result, TripDeskError};
use uuid::Uuid;

use super::allocation::LeaveAllocationService;
use super::ports::LeaveRepository;

pub struct LeaveService {
    leaves: Arc<dyn LeaveRepository>,
    allocation: Arc<LeaveAllocationService>,
    clock: Arc<dyn Clock>,
}

impl LeaveService {
    pub fn new(
        leaves: Arc<dyn LeaveRepository>,
        allocation: Arc<LeaveAllocationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { leaves, allocation, clock }
    }

    /// Store a new `pending` leave after checking the budget of its start
    /// year.
    pub async fn submit(&self, request: LeaveRequest) -> Result<Leave> {
        self.check_budget(&request, None).await?;

        let now = self.clock.now();
        let leave = Leave {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            leave_type: request.leave_type,
            status: LeaveStatus::Pending,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            rejection_reason: None,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        };
        self.leaves.insert(&leave).await?;

        info!(leave_id = %leave.id, user_id = %leave.user_id, days = leave.span().days(), "Leave submitted");
        Ok(leave)
    }

    /// Change type or dates of a pending or approved leave. The budget is
    /// re-checked without counting the leave's current span.
    pub async fn edit(&self, id: Uuid, request: LeaveRequest) -> Result<Leave> {
        let mut leave = self.load(id).await?;
        if !matches!(leave.status, LeaveStatus::Pending | LeaveStatus::Approved) {
            return Err(TripDeskError::Validation(format!(
                "A {} leave can no longer be edited.",
                leave.status.as_str()
            )));
        }
        self.check_budget(&request, Some(id)).await?;

        leave.user_id = request.user_id;
        leave.leave_type = request.leave_type;
        leave.start_date = request.start_date;
        leave.end_date = request.end_date;
        leave.reason = request.reason;
        leave.updated_at = self.clock.now();
        self.leaves.update(&leave).await?;
        Ok(leave)
    }

    pub async fn approve(&self, id: Uuid, approver: Uuid) -> Result<Leave> {
        let mut leave = self.load(id).await?;
        ensure_pending(&leave, "approved")?;

        let now = self.clock.now();
        leave.status = LeaveStatus::Approved;
        leave.approved_by = Some(approver);
        leave.approved_at = Some(now);
        leave.updated_at = now;
        self.leaves.update(&leave).await?;

        info!(leave_id = %id, approver = %approver, "Leave approved");
        Ok(leave)
    }

    pub async fn reject(&self, id: Uuid, approver: Uuid, reason: &str) -> Result<Leave> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(TripDeskError::Validation("A rejection reason is required.".to_string()));
        }

        let mut leave = self.load(id).await?;
        ensure_pending(&leave, "rejected")?;

        let now = self.clock.now();
        leave.status = LeaveStatus::Rejected;
        leave.rejection_reason = Some(reason.to_string());
        leave.approved_by = Some(approver);
        leave.approved_at = Some(now);
        leave.updated_at = now;
        self.leaves.update(&leave).await?;

        info!(leave_id = %id, approver = %approver, "Leave rejected");
        Ok(leave)
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Leave> {
        let mut leave = self.load(id).await?;
        if !matches!(leave.status, LeaveStatus::Pending | LeaveStatus::Approved) {
            return Err(TripDeskError::Validation(format!(
                "Only pending or approved leaves can be cancelled (status is {}).",
                leave.status.as_str()
            )));
        }

        leave.status = LeaveStatus::Cancelled;
        leave.updated_at = self.clock.now();
        self.leaves.update(&leave).await?;
        Ok(leave)
    }

    async fn load(&self, id: Uuid) -> Result<Leave> {
        self.leaves.find_by_id(id).await?.ok_or_else(|| TripDeskError::not_found("leave", id))
    }

    async fn check_budget(&self, request: &LeaveRequest, exclude: Option<Uuid>) -> Result<()> {
        if request.end_date < request.start_date {
            return Err(TripDeskError::Validation(
                "End date must be on or after the start date.".to_string(),
            ));
        }

        let decision = self
            .allocation
            .can_take_leave(
                request.user_id,
                request.leave_type,
                request.start_date,
                request.end_date,
                exclude,
            )
            .await?;

        if decision.allowed {
            Ok(())
        } else {
            Err(TripDeskError::Validation(decision.message))
        }
    }
}

fn ensure_pending(leave: &Leave, action: &str) -> Result<()> {
    if leave.status == LeaveStatus::Pending {
        Ok(())
    } else {
        Err(TripDeskError::Validation(format!(
            "Only pending leaves can be {action} (status is {}).",
            leave.status.as_str()
        )))
    }
}
