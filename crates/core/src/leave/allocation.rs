//! Leave allocation policy
//!
//! Budgets are fixed per calendar year: casual 7, sick 7, annual 14, with a
//! combined cap of 28 days. Leaves that cross a year boundary only count the
//! days that fall inside the year being checked.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::debug;
use tripdesk_common::Clock;
use tripdesk_domain::{
    AllocationBudget, DateSpan, Leave, LeaveDecision, LeaveStatus, LeaveType, LeaveUsage, Result,
    TripDeskError,
};
use uuid::Uuid;

use super::ports::LeaveRepository;

/// Computes leave usage and decides whether a request fits the budget.
pub struct LeaveAllocationService {
    leaves: Arc<dyn LeaveRepository>,
    clock: Arc<dyn Clock>,
    budget: AllocationBudget,
}

impl LeaveAllocationService {
    pub fn new(leaves: Arc<dyn LeaveRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { leaves, clock, budget: AllocationBudget::default() }
    }

    /// Fixed per-type budgets.
    pub fn allocations(&self) -> AllocationBudget {
        self.budget
    }

    /// Approved days used by `user_id` in `year` (current year when `None`).
    pub async fn used_leaves(&self, user_id: Uuid, year: Option<i32>) -> Result<LeaveUsage> {
        let year = year.unwrap_or_else(|| self.clock.today().year());
        let leaves = self
            .leaves
            .find_overlapping(user_id, &[LeaveStatus::Approved], year_span(year)?)
            .await?;

        Ok(usage_in_year(&leaves, year, None))
    }

    /// Check a new or edited request against the budget of the request's own
    /// start year.
    ///
    /// Pending and approved leaves both count. `exclude_leave_id` leaves out
    /// the row being edited so its current span is not counted twice.
    pub async fn can_take_leave(
        &self,
        user_id: Uuid,
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
        exclude_leave_id: Option<Uuid>,
    ) -> Result<LeaveDecision> {
        let Some(allocation) = leave_type.allocation() else {
            return Ok(LeaveDecision::allow());
        };

        let requested = DateSpan::new(start, end);
        if requested.days() == 0 {
            return Ok(LeaveDecision::deny("End date must be on or after the start date."));
        }

        let year = start.year();
        let existing = self
            .leaves
            .find_overlapping(
                user_id,
                &[LeaveStatus::Pending, LeaveStatus::Approved],
                year_span(year)?,
            )
            .await?;
        let used = usage_in_year(&existing, year, exclude_leave_id);
        let requested_days = requested.days();

        debug!(
            user_id = %user_id,
            allocation = allocation.as_str(),
            year,
            used = used.for_type(allocation),
            used_total = used.total,
            requested_days,
            "Checking leave allocation"
        );

        let type_budget = self.budget.for_type(allocation);
        let type_used = used.for_type(allocation);
        if type_used + requested_days > type_budget {
            return Ok(LeaveDecision::deny(format!(
                "Insufficient {} leave balance. Remaining: {} days, Requested: {} days.",
                allocation.as_str(),
                type_budget.saturating_sub(type_used),
                requested_days
            )));
        }

        if used.total + requested_days > self.budget.total {
            return Ok(LeaveDecision::deny(format!(
                "Total yearly leave allocation exceeded. Remaining: {} days, Requested: {} days.",
                self.budget.total.saturating_sub(used.total),
                requested_days
            )));
        }

        Ok(LeaveDecision::allow())
    }
}

fn year_span(year: i32) -> Result<DateSpan> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    match (start, end) {
        (Some(start), Some(end)) => Ok(DateSpan::new(start, end)),
        _ => Err(TripDeskError::InvalidInput(format!("Year out of range: {year}"))),
    }
}

/// Sum counted days per bucket, clipping every leave to `year`.
fn usage_in_year(leaves: &[Leave], year: i32, exclude: Option<Uuid>) -> LeaveUsage {
    let mut usage = LeaveUsage::default();
    for leave in leaves {
        if Some(leave.id) == exclude {
            continue;
        }
        let Some(allocation) = leave.allocation() else {
            continue;
        };
        if let Some(span) = leave.span().clip_to_year(year) {
            usage.add(allocation, span.days());
        }
    }
    usage
}

/// Days left in each bucket after `used`.
pub fn remaining(budget: &AllocationBudget, used: &LeaveUsage) -> LeaveUsage {
    LeaveUsage {
        casual: budget.casual.saturating_sub(used.casual),
        sick: budget.sick.saturating_sub(used.sick),
        annual: budget.annual.saturating_sub(used.annual),
        total: budget.total.saturating_sub(used.total),
    }
}
