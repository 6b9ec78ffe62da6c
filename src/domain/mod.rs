//! Domain layer: Core business types and logic.
//!
//! Plain Rust types for accounts and medication schedules, plus the
//! credential hashing helpers used when users are stored or verified.

mod medicine;
pub mod password;
mod user;

pub use medicine::{Medicine, MedicineId, NewMedicine};
pub use password::{PasswordError, Verification};
pub use user::{NewUser, Session, User, UserId};
