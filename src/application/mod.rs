//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application. Services trim input and apply
//! the presence checks; anything else is the storage backend's job.

mod accounts;
mod schedule;

pub use accounts::{AccountService, LogIn, SignUp};
pub use schedule::{AddMedicine, DeleteMedicine, ScheduleService};
