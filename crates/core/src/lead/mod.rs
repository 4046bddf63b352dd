//! Lead lifecycle and attachments

pub mod ports;
pub mod reference;
pub mod service;

pub use service::LeadService;
