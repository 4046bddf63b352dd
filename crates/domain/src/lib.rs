//! # TripDesk Domain
//!
//! Business domain types for the TripDesk back office.
//!
//! This crate contains:
//! - Closed vocabularies (lead status, leave type, roles, ...) with display
//!   labels and badge colors
//! - Entities: leads, leaves, users and permissions, invoices, vendor bills,
//!   call-center calls, notifications
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other TripDesk crates
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

#[doc(hidden)]
pub use serde as __serde;
