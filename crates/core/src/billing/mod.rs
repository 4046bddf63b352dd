//! Customer payments and vendor bill settlement

pub mod ports;
pub mod service;

pub use service::BillingService;
