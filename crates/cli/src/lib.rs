//! # TripDesk CLI
//!
//! Operator entry point for the back office: schema setup, one-shot data
//! migrations, dashboard reports and leave balances.
//!
//! Every command returns a JSON value; `main` prints it to stdout while logs
//! go to stderr.

pub mod args;
pub mod commands;
pub mod context;

pub use args::{Cli, Command};
pub use commands::run;
pub use context::AppContext;
