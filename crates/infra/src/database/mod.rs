//! Database implementations

pub mod billing_repository;
pub mod call_center_repository;
mod codec;
pub mod lead_repository;
pub mod leave_repository;
pub mod manager;
pub mod notification_repository;
pub mod permission_repository;
pub mod reporting_repository;
pub mod user_repository;

pub use billing_repository::*;
pub use call_center_repository::*;
pub use lead_repository::*;
pub use leave_repository::*;
pub use manager::*;
pub use notification_repository::*;
pub use permission_repository::*;
pub use reporting_repository::*;
pub use user_repository::*;
