//! # TripDesk Common
//!
//! Infrastructure-neutral building blocks shared by the TripDesk crates.
//!
//! - [`error`]: error classification used for logging and batch reporting
//! - [`clock`]: wall-clock abstraction so date-driven rules can be tested
//! - `storage` (feature `storage`): pooled SQLite connections

pub mod clock;
pub mod error;
#[cfg(feature = "storage")]
pub mod storage;

pub use clock::{Clock, MockClock, SystemClock};
pub use error::{ErrorClassification, ErrorSeverity};
