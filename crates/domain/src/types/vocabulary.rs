//! Closed vocabularies
//!
//! Every status-like field in TripDesk is one of the enums below. Each value
//! carries a stored key, a display label and a [`BadgeColor`]. Values read
//! back from storage that no longer belong to their vocabulary are wrapped in
//! [`Recorded::Unrecognized`] instead of failing the read.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::impl_vocabulary;

/// Badge color tag used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Gray,
    Info,
    Primary,
    Warning,
    Success,
    Danger,
}

impl BadgeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Info => "info",
            Self::Primary => "primary",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for BadgeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed set of values with presentation metadata.
pub trait Vocabulary: Sized + Copy + PartialEq + 'static {
    fn all() -> &'static [Self];
    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn color(&self) -> BadgeColor;

    /// Exact (case-insensitive) lookup by stored key.
    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|value| value.as_str().eq_ignore_ascii_case(key))
    }
}

/// Label shown for stored values outside their vocabulary.
pub const UNRECOGNIZED_LABEL: &str = "Unrecognized";

/// A vocabulary value as it was persisted.
///
/// Storage does not reject unknown keys, so reads keep the raw text and the
/// UI shows it as "Unrecognized".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Vocabulary> Recorded<T> {
    pub fn from_raw(raw: &str) -> Self {
        T::from_key(raw).map_or_else(|| Self::Unrecognized(raw.to_string()), Self::Known)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(value) => value.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Known(value) => value.label(),
            Self::Unrecognized(_) => UNRECOGNIZED_LABEL,
        }
    }

    pub fn color(&self) -> BadgeColor {
        match self {
            Self::Known(value) => value.color(),
            Self::Unrecognized(_) => BadgeColor::Gray,
        }
    }

    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is(&self, value: T) -> bool {
        self.known() == Some(value)
    }
}

impl<T> From<T> for Recorded<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: Vocabulary> fmt::Display for Recorded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: Vocabulary> Serialize for Recorded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, T: Vocabulary> Deserialize<'de> for Recorded<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

// ============================================================================
// Leads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeadStatus {
    New,
    AssignedToSales,
    AssignedToOperations,
    InfoGatherComplete,
    RateRequested,
    PricingInProgress,
    Amendment,
    SentToCustomer,
    Confirmed,
    DocumentUploadComplete,
    OperationComplete,
    MarkClosed,
    MarkCompleted,
}

impl_vocabulary!(LeadStatus {
    New => ("new", "New", Gray),
    AssignedToSales => ("assigned_to_sales", "Assigned to Sales", Info),
    AssignedToOperations => ("assigned_to_operations", "Assigned to Operations", Info),
    InfoGatherComplete => ("info_gather_complete", "Info Gather Complete", Primary),
    RateRequested => ("rate_requested", "Rate Requested", Warning),
    PricingInProgress => ("pricing_in_progress", "Pricing In Progress", Warning),
    Amendment => ("amendment", "Amendment", Warning),
    SentToCustomer => ("sent_to_customer", "Sent to Customer", Primary),
    Confirmed => ("confirmed", "Confirmed", Success),
    DocumentUploadComplete => ("document_upload_complete", "Document Upload Complete", Success),
    OperationComplete => ("operation_complete", "Operation Complete", Success),
    MarkClosed => ("mark_closed", "Closed", Danger),
    MarkCompleted => ("mark_completed", "Completed", Success),
});

impl LeadStatus {
    /// Statuses counted as a conversion in reporting.
    pub const CONVERTED: [Self; 3] =
        [Self::Confirmed, Self::OperationComplete, Self::DocumentUploadComplete];

    pub fn is_converted(&self) -> bool {
        Self::CONVERTED.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl_vocabulary!(Priority {
    Low => ("low", "Low", Gray),
    Medium => ("medium", "Medium", Warning),
    High => ("high", "High", Danger),
});

/// Where the lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Facebook,
    Instagram,
    Whatsapp,
    Website,
    Referral,
    WalkIn,
    Phone,
    Email,
    Other,
}

impl_vocabulary!(Platform {
    Facebook => ("facebook", "Facebook", Info),
    Instagram => ("instagram", "Instagram", Danger),
    Whatsapp => ("whatsapp", "WhatsApp", Success),
    Website => ("website", "Website", Primary),
    Referral => ("referral", "Referral", Warning),
    WalkIn => ("walk_in", "Walk-in", Gray),
    Phone => ("phone", "Phone", Gray),
    Email => ("email", "Email", Gray),
    Other => ("other", "Other", Gray),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Pending,
    InProgress,
    Done,
}

impl_vocabulary!(ServiceStatus {
    Pending => ("pending", "Pending", Gray),
    InProgress => ("in_progress", "In Progress", Warning),
    Done => ("done", "Done", Success),
});

/// The four fulfillment trackers attached to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    AirTicket,
    Hotel,
    Visa,
    LandPackage,
}

impl_vocabulary!(ServiceKind {
    AirTicket => ("air_ticket", "Air Ticket", Info),
    Hotel => ("hotel", "Hotel", Info),
    Visa => ("visa", "Visa", Info),
    LandPackage => ("land_package", "Land Package", Info),
});

// ============================================================================
// Leave
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Maternity,
    Paternity,
    Emergency,
    Unpaid,
}

impl_vocabulary!(LeaveType {
    Annual => ("annual", "Annual Leave", Primary),
    Sick => ("sick", "Sick Leave", Danger),
    Personal => ("personal", "Personal Leave", Info),
    Maternity => ("maternity", "Maternity Leave", Success),
    Paternity => ("paternity", "Paternity Leave", Success),
    Emergency => ("emergency", "Emergency Leave", Warning),
    Unpaid => ("unpaid", "Unpaid Leave", Gray),
});

impl LeaveType {
    /// Allocation bucket this leave type draws from, if any.
    ///
    /// Personal and emergency leave are casual leave; maternity, paternity
    /// and unpaid leave have no annual budget.
    pub fn allocation(&self) -> Option<AllocationType> {
        match self {
            Self::Annual => Some(AllocationType::Annual),
            Self::Sick => Some(AllocationType::Sick),
            Self::Personal | Self::Emergency => Some(AllocationType::Casual),
            Self::Maternity | Self::Paternity | Self::Unpaid => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl_vocabulary!(LeaveStatus {
    Pending => ("pending", "Pending", Warning),
    Approved => ("approved", "Approved", Success),
    Rejected => ("rejected", "Rejected", Danger),
    Cancelled => ("cancelled", "Cancelled", Gray),
});

/// Budgeted leave categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationType {
    Casual,
    Sick,
    Annual,
}

impl_vocabulary!(AllocationType {
    Casual => ("casual", "Casual", Info),
    Sick => ("sick", "Sick", Danger),
    Annual => ("annual", "Annual", Primary),
});

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Hr,
    Sales,
    Operation,
    Marketing,
    Account,
    CallCenter,
}

impl_vocabulary!(Role {
    Admin => ("admin", "Admin", Danger),
    Hr => ("hr", "HR", Warning),
    Sales => ("sales", "Sales", Primary),
    Operation => ("operation", "Operation", Info),
    Marketing => ("marketing", "Marketing", Success),
    Account => ("account", "Account", Gray),
    CallCenter => ("call_center", "Call Center", Info),
});

// ============================================================================
// Billing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Cancelled,
}

impl_vocabulary!(InvoiceStatus {
    Draft => ("draft", "Draft", Gray),
    Pending => ("pending", "Pending", Warning),
    Paid => ("paid", "Paid", Success),
    Cancelled => ("cancelled", "Cancelled", Danger),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerPaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl_vocabulary!(CustomerPaymentStatus {
    Unpaid => ("unpaid", "Unpaid", Danger),
    Partial => ("partial", "Partially Paid", Warning),
    Paid => ("paid", "Paid", Success),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorPaymentStatus {
    Pending,
    Paid,
}

impl_vocabulary!(VendorPaymentStatus {
    Pending => ("pending", "Pending", Warning),
    Paid => ("paid", "Paid", Success),
});

// ============================================================================
// Call center
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    PreDeparture,
    PostArrival,
}

impl_vocabulary!(CallType {
    PreDeparture => ("pre_departure", "Pre-Departure", Info),
    PostArrival => ("post_arrival", "Post-Arrival", Primary),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallStatus {
    Pending,
    Assigned,
    Called,
    NotAnswered,
    Completed,
}

impl_vocabulary!(CallStatus {
    Pending => ("pending", "Pending", Gray),
    Assigned => ("assigned", "Assigned", Info),
    Called => ("called", "Called", Primary),
    NotAnswered => ("not_answered", "Not Answered", Warning),
    Completed => ("completed", "Completed", Success),
});

// ============================================================================
// Notifications
// ============================================================================

/// Discriminator used for per-area unread counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NotificationType {
    LeadAssignment,
    LeadStatusChange,
    NewLead,
    ServiceStatusChange,
}

impl_vocabulary!(NotificationType {
    LeadAssignment => ("lead_assignment", "Lead Assignment", Info),
    LeadStatusChange => ("lead_status_change", "Lead Status Change", Primary),
    NewLead => ("new_lead", "New Lead", Success),
    ServiceStatusChange => ("service_status_change", "Service Status Change", Warning),
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_has_thirteen_members() {
        assert_eq!(LeadStatus::ALL.len(), 13);
        assert_eq!(LeadStatus::InfoGatherComplete.as_str(), "info_gather_complete");
        assert_eq!(LeadStatus::MarkClosed.label(), "Closed");
        assert_eq!(LeadStatus::MarkClosed.color(), BadgeColor::Danger);
    }

    #[test]
    fn converted_statuses() {
        assert!(LeadStatus::Confirmed.is_converted());
        assert!(LeadStatus::DocumentUploadComplete.is_converted());
        assert!(!LeadStatus::SentToCustomer.is_converted());
        assert!(!LeadStatus::MarkCompleted.is_converted());
    }

    #[test]
    fn unknown_status_is_kept_as_unrecognized() {
        let status: Recorded<LeadStatus> = Recorded::from_raw("on_hold");
        assert_eq!(status, Recorded::Unrecognized("on_hold".to_string()));
        assert_eq!(status.label(), "Unrecognized");
        assert_eq!(status.color(), BadgeColor::Gray);
        assert_eq!(status.as_str(), "on_hold");
        assert_eq!(status.known(), None);
    }

    #[test]
    fn recorded_round_trips_through_json() {
        let status: Recorded<ServiceStatus> = serde_json::from_str("\"in_progress\"").unwrap();
        assert!(status.is(ServiceStatus::InProgress));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"in_progress\"");

        let odd: Recorded<ServiceStatus> = serde_json::from_str("\"stalled\"").unwrap();
        assert_eq!(serde_json::to_string(&odd).unwrap(), "\"stalled\"");
    }

    #[test]
    fn leave_types_map_onto_allocation_buckets() {
        assert_eq!(LeaveType::Annual.allocation(), Some(AllocationType::Annual));
        assert_eq!(LeaveType::Sick.allocation(), Some(AllocationType::Sick));
        assert_eq!(LeaveType::Personal.allocation(), Some(AllocationType::Casual));
        assert_eq!(LeaveType::Emergency.allocation(), Some(AllocationType::Casual));
        assert_eq!(LeaveType::Maternity.allocation(), None);
        assert_eq!(LeaveType::Unpaid.allocation(), None);
    }

    #[test]
    fn from_key_is_case_insensitive() {
        assert_eq!(Role::from_key("Call_Center"), Some(Role::CallCenter));
        assert_eq!(Platform::from_key("walk_in"), Some(Platform::WalkIn));
        assert_eq!(Role::from_key("owner"), None);
    }
}
