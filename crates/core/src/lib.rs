//! # TripDesk Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for every persisted entity
//! - Business rules: leave allocation, lead lifecycle, notification fan-out,
//!   reporting, billing, call center, permissions
//!
//! ## Architecture Principles
//! - Only depends on `tripdesk-common` and `tripdesk-domain`
//! - No database, HTTP, or filesystem code
//! - All external dependencies via traits

pub mod billing;
pub mod call_center;
pub mod lead;
pub mod leave;
pub mod notification;
pub mod permissions;
pub mod reporting;
pub mod user;

pub use billing::ports::BillingRepository;
pub use billing::BillingService;
pub use call_center::ports::CallCenterRepository;
pub use call_center::CallCenterService;
pub use lead::ports::{AttachmentRepository, AttachmentStore, LeadRepository};
pub use lead::LeadService;
pub use leave::ports::LeaveRepository;
pub use leave::{LeaveAllocationService, LeaveService};
pub use notification::ports::NotificationStore;
pub use notification::{NotificationDispatcher, NotificationPlanner};
pub use permissions::ports::PermissionRepository;
pub use permissions::{default_permissions_for, PermissionService};
pub use reporting::ports::ReportingRepository;
pub use reporting::ReportingService;
pub use user::ports::UserDirectory;
