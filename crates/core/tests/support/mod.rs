//! Shared test helpers for `tripdesk-core` integration tests.
//!
//! In-memory implementations of every core port plus small fixture builders,
//! so tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod fixtures;
pub mod repositories;

pub use fixtures::*;
pub use repositories::*;
