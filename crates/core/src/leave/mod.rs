//! Leave allocation policy and leave lifecycle

pub mod allocation;
pub mod ports;
pub mod service;

pub use allocation::LeaveAllocationService;
pub use service::LeaveService;
