//! Notification fan-out
//!
//! [`NotificationPlanner`] turns a lead mutation into a list of
//! [`NotificationIntent`](tripdesk_domain::NotificationIntent)s;
//! [`NotificationDispatcher`] stores them one by one. Delivery is best-effort
//! and never fails the mutation that triggered it.

pub mod dispatcher;
pub mod planner;
pub mod ports;

pub use dispatcher::NotificationDispatcher;
pub use planner::NotificationPlanner;
