//! Account service: signup and login.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::adapters::StorageError;
use crate::domain::{NewUser, Session};
use crate::ports::Storage;
use crate::{MedischedulerError, Result};

/// Outcome of a signup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUp {
    Created,
    MissingFields,
    UsernameTaken,
}

impl SignUp {
    /// Message shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "Account created successfully!",
            Self::MissingFields => "All fields are required.",
            Self::UsernameTaken => "Username already exists!",
        }
    }
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogIn {
    Authenticated(Session),
    MissingFields,
    InvalidCredentials,
}

impl LogIn {
    /// Message shown to the user.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Authenticated(_) => "Login successful!",
            Self::MissingFields => "Enter both username and password.",
            Self::InvalidCredentials => "Invalid credentials.",
        }
    }
}

/// Service for creating accounts and opening sessions.
pub struct AccountService<S>
where
    S: Storage,
{
    storage: Arc<S>,
}

impl<S> AccountService<S>
where
    S: Storage,
    S::Error: Into<StorageError>,
{
    /// Create a new account service.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn sign_up(&self, username: &str, email: &str, password: &str) -> Result<SignUp> {
        let input = NewUser::new(username, email, password);
        if input.validate().is_err() {
            return Ok(SignUp::MissingFields);
        }

        let created = self
            .storage
            .register_user(&input.username, &input.email, &input.password)
            .map_err(|e| MedischedulerError::Storage(e.into()))?;

        Ok(if created {
            SignUp::Created
        } else {
            SignUp::UsernameTaken
        })
    }

    /// Check credentials and open a session.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn log_in(&self, username: &str, password: &str) -> Result<LogIn> {
        let username = username.trim();
        let password = Zeroizing::new(password.trim().to_string());
        if username.is_empty() || password.is_empty() {
            return Ok(LogIn::MissingFields);
        }

        let user = self
            .storage
            .verify_credentials(username, &password)
            .map_err(|e| MedischedulerError::Storage(e.into()))?;

        Ok(match user {
            Some(user) => {
                tracing::info!(user_id = user.id.0, "User {} logged in", user.username);
                LogIn::Authenticated(Session::from(user))
            }
            None => LogIn::InvalidCredentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteStorage;

    fn service() -> AccountService<SqliteStorage> {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        AccountService::new(Arc::new(storage))
    }

    #[test]
    fn test_sign_up_then_log_in() {
        let accounts = service();

        assert_eq!(
            accounts.sign_up("alice", "a@x.com", "pw").expect("Should sign up"),
            SignUp::Created
        );

        match accounts.log_in("alice", "pw").expect("Should log in") {
            LogIn::Authenticated(session) => assert_eq!(session.username, "alice"),
            other => panic!("Expected session, got {other:?}"),
        }
    }

    #[test]
    fn test_sign_up_duplicate() {
        let accounts = service();
        accounts.sign_up("alice", "a@x.com", "pw").expect("Should sign up");

        let outcome = accounts.sign_up("alice", "b@y.com", "pw2").expect("Should not error");
        assert_eq!(outcome, SignUp::UsernameTaken);
        assert_eq!(outcome.message(), "Username already exists!");
    }

    #[test]
    fn test_sign_up_requires_all_fields() {
        let accounts = service();
        let outcome = accounts.sign_up("alice", "  ", "pw").expect("Should not error");
        assert_eq!(outcome, SignUp::MissingFields);

        // Nothing was written, so the username is still free.
        assert_eq!(
            accounts.sign_up("alice", "a@x.com", "pw").expect("Should sign up"),
            SignUp::Created
        );
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let accounts = service();
        accounts.sign_up(" alice ", "a@x.com", " pw ").expect("Should sign up");

        assert!(matches!(
            accounts.log_in("alice", "pw").expect("Should log in"),
            LogIn::Authenticated(_)
        ));
    }

    #[test]
    fn test_log_in_failures() {
        let accounts = service();
        accounts.sign_up("alice", "a@x.com", "pw").expect("Should sign up");

        assert_eq!(accounts.log_in("", "pw").expect("ok"), LogIn::MissingFields);
        assert_eq!(accounts.log_in("alice", " ").expect("ok"), LogIn::MissingFields);
        assert_eq!(accounts.log_in("alice", "nope").expect("ok"), LogIn::InvalidCredentials);
        assert_eq!(
            accounts.log_in("mallory", "pw").expect("ok").message(),
            "Invalid credentials."
        );
    }
}
