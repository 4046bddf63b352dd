//! Pre-departure and post-arrival customer calls

pub mod ports;
pub mod service;

pub use service::CallCenterService;
