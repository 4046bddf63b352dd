//! Domain types and models

pub mod attachment;
pub mod billing;
pub mod call_center;
pub mod lead;
pub mod leave;
pub mod notification;
pub mod reporting;
pub mod user;
pub mod vocabulary;

pub use attachment::{attachment_key, sanitize_file_name, Attachment, AttachmentStorage};
pub use billing::{payment_status_for, CustomerPayment, Invoice, VendorBill};
pub use call_center::CallCenterCall;
pub use lead::{Lead, LeadChanges, LeadDraft, ServiceStatuses};
pub use leave::{
    AllocationBudget, DateSpan, Leave, LeaveDecision, LeaveRequest, LeaveUsage,
};
pub use notification::{DeliveryReport, Notification, NotificationIntent};
pub use reporting::{DashboardSummary, DateRangePreset, ReportFilters};
pub use user::{Permission, PermissionGrant, PermissionGroup, User};
pub use vocabulary::{
    AllocationType, BadgeColor, CallStatus, CallType, CustomerPaymentStatus, InvoiceStatus,
    LeadStatus, LeaveStatus, LeaveType, NotificationType, Platform, Priority, Recorded, Role,
    ServiceKind, ServiceStatus, VendorPaymentStatus, Vocabulary, UNRECOGNIZED_LABEL,
};
