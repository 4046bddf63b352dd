//! Dashboard reporting aggregates

pub mod ports;
pub mod service;

pub use service::ReportingService;
