//! Storage port: Trait for persistent storage operations.
//!
//! This trait abstracts the storage backend (SQLite) from the application logic.
//! Every method is a single atomic statement against the store; nothing spans
//! more than one call.

use crate::domain::{Medicine, MedicineId, User, UserId};

/// Trait for local storage of accounts and medication schedules.
pub trait Storage: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ensure the `users` and `medicines` tables exist.
    ///
    /// Idempotent: repeat calls succeed without touching existing data.
    ///
    /// # Errors
    /// Returns error if the schema cannot be created.
    fn initialize_schema(&self) -> Result<(), Self::Error>;

    /// Create a new account.
    ///
    /// # Returns
    /// `false` if the username is already taken; nothing is written in that case.
    ///
    /// # Errors
    /// Returns error for any failure other than a duplicate username.
    fn register_user(&self, username: &str, email: &str, password: &str)
        -> Result<bool, Self::Error>;

    /// Look up the account with this username and check the password.
    ///
    /// # Returns
    /// `None` if no such user exists or the password does not match.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn verify_credentials(&self, username: &str, password: &str)
        -> Result<Option<User>, Self::Error>;

    /// Add a medicine to a user's schedule.
    ///
    /// # Errors
    /// Returns error if the user does not exist or storage operation fails.
    fn add_medicine(
        &self,
        user_id: UserId,
        name: &str,
        dosage: &str,
        time: &str,
    ) -> Result<MedicineId, Self::Error>;

    /// List every medicine owned by `user_id`, in insertion order.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn list_medicines(&self, user_id: UserId) -> Result<Vec<Medicine>, Self::Error>;

    /// Delete a medicine by ID, whoever owns it.
    ///
    /// Deleting an ID that does not exist is not an error.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn delete_medicine(&self, id: MedicineId) -> Result<(), Self::Error>;
}
