//! User lookups shared by fan-out, permissions and batch jobs

pub mod ports;
