//! SQLite backend
//!
//! r2d2-based connection pool with per-connection pragmas.

pub mod connection;
pub mod pool;
pub mod pragmas;

pub use connection::{SqliteConnection, SqliteStatement};
pub use pool::{HealthStatus, SqlitePool};
pub use pragmas::apply_connection_pragmas;
