//! SQLite adapter: Implementation of Storage.
//!
//! Provides local persistence for accounts and medication schedules.
//!
//! # Connection Handling
//!
//! One connection per storage instance, protected by a `Mutex`. Every
//! operation takes the lock for the duration of a single statement and the
//! guard releases it on every exit path. A poisoned mutex surfaces as
//! [`StorageError::LockPoisoned`].
//!
//! # Credentials
//!
//! Passwords are stored as Argon2id PHC strings. Plain-text rows left by
//! earlier releases still verify and are re-hashed on the first successful
//! login.
use std::os::raw::c_int;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};
use zeroize::Zeroizing;

use crate::domain::{
    password::{self, PasswordError, Verification},
    Medicine, MedicineId, User, UserId,
};
use crate::ports::Storage;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    #[error("No user with id {0}")]
    UnknownUser(UserId),

    #[error("Credential error: {0}")]
    Password(#[from] PasswordError),
}

/// SQLite storage adapter.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the SQLite database at `path` and ensure the schema.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!("Opened database at {}", path.as_ref().display());
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Replace a plain-text credential with its hash.
    fn upgrade_credential(&self, id: UserId, password: &str) -> Result<(), StorageError> {
        let hashed = password::hash_password(password)?;
        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET password = ?1 WHERE id = ?2",
            params![hashed, id.0],
        )?;
        Ok(())
    }

    fn row_to_medicine(row: &Row) -> rusqlite::Result<Medicine> {
        Ok(Medicine {
            id: MedicineId(row.get(0)?),
            user_id: UserId(row.get(1)?),
            name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            dosage: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            time: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    }
}

/// Whether `err` is a constraint violation with the given extended code.
fn is_constraint_violation(err: &rusqlite::Error, extended: c_int) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation && e.extended_code == extended
    )
}

impl Storage for SqliteStorage {
    type Error = StorageError;

    fn initialize_schema(&self) -> Result<(), Self::Error> {
        let conn = self.conn()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE,
                email TEXT,
                password TEXT
            );

            CREATE TABLE IF NOT EXISTS medicines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                medicine_name TEXT,
                dosage TEXT,
                time TEXT,
                FOREIGN KEY(user_id) REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_medicines_user
                ON medicines(user_id);
            ",
        )?;

        Ok(())
    }

    fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, Self::Error> {
        // Hash before taking the lock; Argon2 is deliberately slow.
        let hashed = password::hash_password(password)?;
        let conn = self.conn()?;

        let result = conn.execute(
            "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)",
            params![username, email, hashed],
        );

        match result {
            Ok(_) => {
                tracing::info!(
                    user_id = conn.last_insert_rowid(),
                    "Registered user {}",
                    username
                );
                Ok(true)
            }
            Err(e) if is_constraint_violation(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                tracing::info!("Username {} already taken", username);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, Self::Error> {
        let found = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT id, username, email, password FROM users WHERE username = ?1",
                params![username],
                |row| {
                    let user = User {
                        id: UserId(row.get(0)?),
                        username: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    };
                    let stored: Option<String> = row.get(3)?;
                    Ok((user, stored.map(Zeroizing::new)))
                },
            )
            .optional()?
        };

        let Some((user, Some(stored))) = found else {
            tracing::debug!("Login rejected for {}", username);
            return Ok(None);
        };

        match password::verify_password(password, &stored) {
            Verification::Match => Ok(Some(user)),
            Verification::MatchNeedsUpgrade => {
                // The login already succeeded; a failed upgrade only leaves the old row.
                if let Err(e) = self.upgrade_credential(user.id, password) {
                    tracing::warn!(user_id = user.id.0, "Failed to upgrade credential: {}", e);
                } else {
                    tracing::info!(user_id = user.id.0, "Upgraded plain-text credential");
                }
                Ok(Some(user))
            }
            Verification::Mismatch => {
                tracing::debug!("Login rejected for {}", username);
                Ok(None)
            }
        }
    }

    fn add_medicine(
        &self,
        user_id: UserId,
        name: &str,
        dosage: &str,
        time: &str,
    ) -> Result<MedicineId, Self::Error> {
        let conn = self.conn()?;

        conn.execute(
            r"
            INSERT INTO medicines (user_id, medicine_name, dosage, time)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![user_id.0, name, dosage, time],
        )
        .map_err(|e| {
            if is_constraint_violation(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                StorageError::UnknownUser(user_id)
            } else {
                e.into()
            }
        })?;

        let id = MedicineId(conn.last_insert_rowid());
        tracing::debug!(user_id = user_id.0, medicine_id = id.0, "Added medicine");
        Ok(id)
    }

    fn list_medicines(&self, user_id: UserId) -> Result<Vec<Medicine>, Self::Error> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r"
            SELECT id, user_id, medicine_name, dosage, time
            FROM medicines
            WHERE user_id = ?1
            ORDER BY id
            ",
        )?;

        let medicines = stmt
            .query_map(params![user_id.0], Self::row_to_medicine)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(medicines)
    }

    fn delete_medicine(&self, id: MedicineId) -> Result<(), Self::Error> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM medicines WHERE id = ?1", params![id.0])?;
        tracing::debug!(medicine_id = id.0, affected, "Deleted medicine");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_rows(storage: &SqliteStorage, username: &str) -> i64 {
        let conn = storage.conn().expect("Should lock");
        conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .expect("Should count")
    }

    fn stored_password(storage: &SqliteStorage, username: &str) -> String {
        let conn = storage.conn().expect("Should lock");
        conn.query_row(
            "SELECT password FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .expect("Should read")
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.initialize_schema().expect("Second init should succeed");
        storage.initialize_schema().expect("Third init should succeed");
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let storage = SqliteStorage::in_memory().expect("Should create db");

        assert!(storage.register_user("alice", "a@x.com", "pw").expect("Should register"));
        assert!(!storage.register_user("alice", "b@y.com", "pw2").expect("Should not error"));
        assert_eq!(user_rows(&storage, "alice"), 1);

        // The original credential is untouched.
        let user = storage
            .verify_credentials("alice", "pw")
            .expect("Should verify")
            .expect("Should match");
        assert_eq!(user.email, "a@x.com");
        assert!(storage.verify_credentials("alice", "pw2").expect("Should verify").is_none());
    }

    #[test]
    fn test_password_is_not_stored_verbatim() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.register_user("alice", "a@x.com", "pw").expect("Should register");

        let stored = stored_password(&storage, "alice");
        assert_ne!(stored, "pw");
        assert!(password::is_hashed(&stored));
    }

    #[test]
    fn test_verify_credentials() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.register_user("alice", "a@x.com", "pw").expect("Should register");

        let user = storage
            .verify_credentials("alice", "pw")
            .expect("Should verify")
            .expect("Should match");
        assert_eq!(user.username, "alice");

        assert!(storage.verify_credentials("alice", "PW").expect("Should verify").is_none());
        assert!(storage.verify_credentials("bob", "pw").expect("Should verify").is_none());
        assert!(storage.verify_credentials("Alice", "pw").expect("Should verify").is_none());
    }

    #[test]
    fn test_plain_text_credential_upgraded_on_login() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        {
            let conn = storage.conn().expect("Should lock");
            conn.execute(
                "INSERT INTO users (username, email, password) VALUES ('legacy', 'l@x.com', 'pw')",
                [],
            )
            .expect("Should insert legacy row");
        }

        assert!(storage.verify_credentials("legacy", "nope").expect("Should verify").is_none());
        assert_eq!(stored_password(&storage, "legacy"), "pw");

        let user = storage
            .verify_credentials("legacy", "pw")
            .expect("Should verify")
            .expect("Should match");
        assert_eq!(user.username, "legacy");

        assert!(password::is_hashed(&stored_password(&storage, "legacy")));
        assert!(storage.verify_credentials("legacy", "pw").expect("Should verify").is_some());
    }

    #[test]
    fn test_medicine_crud() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.register_user("alice", "a@x.com", "pw").expect("Should register");
        let alice = storage
            .verify_credentials("alice", "pw")
            .expect("Should verify")
            .expect("Should match");

        assert!(storage.list_medicines(alice.id).expect("Should list").is_empty());

        let id = storage
            .add_medicine(alice.id, "Aspirin", "1 pill", "8:00 AM")
            .expect("Should add");

        let listed = storage.list_medicines(alice.id).expect("Should list");
        assert_eq!(
            listed,
            vec![Medicine {
                id,
                user_id: alice.id,
                name: "Aspirin".to_string(),
                dosage: "1 pill".to_string(),
                time: "8:00 AM".to_string(),
            }]
        );

        storage.delete_medicine(id).expect("Should delete");
        assert!(storage.list_medicines(alice.id).expect("Should list").is_empty());

        // Deleting again is a no-op.
        storage.delete_medicine(id).expect("Repeat delete should not error");
    }

    #[test]
    fn test_medicine_ids_are_fresh() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.register_user("alice", "a@x.com", "pw").expect("Should register");
        let alice = storage
            .verify_credentials("alice", "pw")
            .expect("Should verify")
            .expect("Should match");

        let first = storage.add_medicine(alice.id, "A", "1", "8").expect("Should add");
        storage.delete_medicine(first).expect("Should delete");
        let second = storage.add_medicine(alice.id, "A", "1", "8").expect("Should add");

        assert!(second > first);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.register_user("alice", "a@x.com", "pw").expect("Should register");
        let alice = storage
            .verify_credentials("alice", "pw")
            .expect("Should verify")
            .expect("Should match");

        for name in ["Zinc", "Aspirin", "Metformin"] {
            storage.add_medicine(alice.id, name, "1", "8:00").expect("Should add");
        }

        let names: Vec<String> = storage
            .list_medicines(alice.id)
            .expect("Should list")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["Zinc", "Aspirin", "Metformin"]);
    }

    #[test]
    fn test_medicines_isolated_per_user() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.register_user("alice", "a@x.com", "pw").expect("Should register");
        storage.register_user("bob", "b@x.com", "pw").expect("Should register");
        let alice = storage.verify_credentials("alice", "pw").expect("ok").expect("alice");
        let bob = storage.verify_credentials("bob", "pw").expect("ok").expect("bob");

        storage.add_medicine(alice.id, "Aspirin", "1 pill", "8:00 AM").expect("Should add");

        assert!(storage.list_medicines(bob.id).expect("Should list").is_empty());
        assert_eq!(storage.list_medicines(alice.id).expect("Should list").len(), 1);
    }

    #[test]
    fn test_delete_ignores_owner() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        storage.register_user("alice", "a@x.com", "pw").expect("Should register");
        storage.register_user("bob", "b@x.com", "pw").expect("Should register");
        let alice = storage.verify_credentials("alice", "pw").expect("ok").expect("alice");
        let bob = storage.verify_credentials("bob", "pw").expect("ok").expect("bob");

        let id = storage.add_medicine(alice.id, "Aspirin", "1 pill", "8:00 AM").expect("add");
        storage.add_medicine(bob.id, "Zinc", "1 tab", "noon").expect("add");
        assert!(storage
            .list_medicines(bob.id)
            .expect("Should list")
            .iter()
            .all(|m| m.id != id));

        // Deleting by id alone removes alice's row even though bob is the one asking.
        storage.delete_medicine(id).expect("Should delete");
        assert!(storage.list_medicines(alice.id).expect("Should list").is_empty());
        assert_eq!(storage.list_medicines(bob.id).expect("Should list").len(), 1);
    }

    #[test]
    fn test_add_medicine_for_unknown_user() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        let result = storage.add_medicine(UserId(42), "Aspirin", "1 pill", "8:00 AM");
        assert!(matches!(result, Err(StorageError::UnknownUser(UserId(42)))));
    }
}
