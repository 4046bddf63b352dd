//! Granular permissions and permission groups

pub mod defaults;
pub mod ports;
pub mod service;

pub use defaults::default_permissions_for;
pub use service::PermissionService;
