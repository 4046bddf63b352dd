//! Attachment byte storage

pub mod local;

pub use local::LocalAttachmentStore;
