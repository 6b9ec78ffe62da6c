//! Account types.

use std::fmt;

use zeroize::Zeroizing;

/// Database identifier of a user (auto-assigned, never reused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account.
///
/// The stored credential never leaves the storage adapter, so it is not part
/// of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Signup input after trimming.
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl NewUser {
    /// Build signup input, trimming surrounding whitespace from every field.
    #[must_use]
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: Zeroizing::new(password.trim().to_string()),
        }
    }

    /// Check that every field is present.
    ///
    /// # Errors
    /// Returns the labels of the empty fields.
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let missing: Vec<&'static str> = [
            ("username", self.username.is_empty()),
            ("email", self.email.is_empty()),
            ("password", self.password.is_empty()),
        ]
        .into_iter()
        .filter_map(|(label, empty)| empty.then_some(label))
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

/// Runtime association between an authenticated user and the dashboard.
///
/// Never persisted; dropped on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
}

impl From<User> for Session {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_trims_fields() {
        let input = NewUser::new("  alice ", " a@x.com", "pw  ");
        assert_eq!(input.username, "alice");
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.password.as_str(), "pw");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_whitespace_only_fields_are_missing() {
        let input = NewUser::new("alice", "   ", "");
        assert_eq!(input.validate(), Err(vec!["email", "password"]));
    }

    #[test]
    fn test_session_from_user() {
        let user = User {
            id: UserId(7),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
        };
        let session = Session::from(user);
        assert_eq!(session.user_id, UserId(7));
        assert_eq!(session.username, "alice");
    }
}
