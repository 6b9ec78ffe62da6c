//! # Medischeduler
//!
//! Personal medication schedule tracker backed by a local SQLite file.
//!
//! This crate provides:
//! - Account signup and login
//! - Per-user medicine lists (name, dosage, free-text time)
//! - Terminal UI for local-only use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (User, Medicine, Session) and credential hashing
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (SQLite, log sanitization)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Runtime settings from the environment
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Medicine, MedicineId, Session, User, UserId};

/// Result type for Medischeduler operations
pub type Result<T> = std::result::Result<T, MedischedulerError>;

/// Main error type for Medischeduler
#[derive(Debug, thiserror::Error)]
pub enum MedischedulerError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),
}
