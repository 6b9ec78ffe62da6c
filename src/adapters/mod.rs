//! Adapters layer: Concrete implementations of ports.
//!
//! - `sqlite`: SQLite for local storage
//! - `sanitize`: redaction of account data in logs

pub mod sanitize;
pub mod sqlite;

// Re-export storage error for lib.rs
pub use sqlite::StorageError;
