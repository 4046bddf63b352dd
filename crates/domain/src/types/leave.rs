//! Leave records and allocation types

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vocabulary::{AllocationType, LeaveStatus, LeaveType};
use crate::constants::{
    ANNUAL_LEAVE_DAYS, CASUAL_LEAVE_DAYS, SICK_LEAVE_DAYS, TOTAL_LEAVE_DAYS,
};

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days covered, counting both ends. Zero for inverted spans.
    pub fn days(&self) -> u32 {
        let days = (self.end - self.start).num_days() + 1;
        u32::try_from(days).unwrap_or(0)
    }

    /// Portion of the span inside the calendar year, if any.
    pub fn clip_to_year(&self, year: i32) -> Option<Self> {
        let year_start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let year_end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        let start = self.start.max(year_start);
        let end = self.end.min(year_end);
        (start <= end).then_some(Self { start, end })
    }

    pub fn overlaps_year(&self, year: i32) -> bool {
        self.clip_to_year(year).is_some()
    }

    pub fn start_year(&self) -> i32 {
        self.start.year()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Leave {
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
    }

    pub fn allocation(&self) -> Option<AllocationType> {
        self.leave_type.allocation()
    }
}

/// A leave request as submitted or edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub user_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl LeaveRequest {
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
    }
}

/// Outcome of a budget check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDecision {
    pub allowed: bool,
    pub message: String,
}

impl LeaveDecision {
    pub fn allow() -> Self {
        Self { allowed: true, message: "Leave request is within allocation.".to_string() }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self { allowed: false, message: message.into() }
    }
}

/// Per-bucket day budgets for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationBudget {
    pub casual: u32,
    pub sick: u32,
    pub annual: u32,
    pub total: u32,
}

impl Default for AllocationBudget {
    fn default() -> Self {
        Self {
            casual: CASUAL_LEAVE_DAYS,
            sick: SICK_LEAVE_DAYS,
            annual: ANNUAL_LEAVE_DAYS,
            total: TOTAL_LEAVE_DAYS,
        }
    }
}

impl AllocationBudget {
    pub fn for_type(&self, allocation: AllocationType) -> u32 {
        match allocation {
            AllocationType::Casual => self.casual,
            AllocationType::Sick => self.sick,
            AllocationType::Annual => self.annual,
        }
    }
}

/// Days counted against each bucket within one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveUsage {
    pub casual: u32,
    pub sick: u32,
    pub annual: u32,
    pub total: u32,
}

impl LeaveUsage {
    pub fn add(&mut self, allocation: AllocationType, days: u32) {
        match allocation {
            AllocationType::Casual => self.casual += days,
            AllocationType::Sick => self.sick += days,
            AllocationType::Annual => self.annual += days,
        }
        self.total += days;
    }

    pub fn for_type(&self, allocation: AllocationType) -> u32 {
        match allocation {
            AllocationType::Casual => self.casual,
            AllocationType::Sick => self.sick,
            AllocationType::Annual => self.annual,
        }
    }
}
