//! Call-center follow-up calls

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vocabulary::{CallStatus, CallType};

const PRE_DEPARTURE_CHECKLIST: &[&str] = &[
    "passport_validity",
    "visa_status",
    "flight_tickets",
    "hotel_voucher",
    "travel_insurance",
    "airport_transfer",
];

const POST_ARRIVAL_CHECKLIST: &[&str] = &[
    "hotel_checkin",
    "transfer_experience",
    "tour_guide",
    "overall_satisfaction",
    "issues_reported",
];

impl CallType {
    /// Checklist item keys agents tick off for this kind of call.
    pub fn checklist(&self) -> &'static [&'static str] {
        match self {
            Self::PreDeparture => PRE_DEPARTURE_CHECKLIST,
            Self::PostArrival => POST_ARRIVAL_CHECKLIST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCenterCall {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub call_type: CallType,
    pub agent_id: Option<Uuid>,
    pub status: CallStatus,
    pub call_attempts: u32,
    pub call_checklist_completed: BTreeSet<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CallCenterCall {
    pub fn new(lead_id: Uuid, call_type: CallType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            lead_id,
            call_type,
            agent_id: None,
            status: CallStatus::Pending,
            call_attempts: 0,
            call_checklist_completed: BTreeSet::new(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `status`; entering `called` or `not_answered` from a different
    /// status counts as one attempt.
    pub fn transition(&mut self, status: CallStatus) {
        let counts_attempt = matches!(status, CallStatus::Called | CallStatus::NotAnswered);
        if counts_attempt && self.status != status {
            self.call_attempts += 1;
        }
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_checklist_item(&self, key: &str) -> bool {
        self.call_type.checklist().contains(&key)
    }
}
