//! Schedule service: the signed-in user's medicine list.

use std::sync::Arc;

use crate::adapters::StorageError;
use crate::domain::{Medicine, MedicineId, NewMedicine, Session};
use crate::ports::Storage;
use crate::{MedischedulerError, Result};

/// Outcome of adding a medicine from the dashboard form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMedicine {
    Added(MedicineId),
    MissingFields,
}

impl AddMedicine {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Added(_) => "Medicine added successfully!",
            Self::MissingFields => "Please fill all fields.",
        }
    }
}

/// Outcome of deleting the selected medicine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMedicine {
    Deleted,
    NothingSelected,
}

impl DeleteMedicine {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Deleted => "Medicine deleted successfully!",
            Self::NothingSelected => "Please select a medicine to delete.",
        }
    }
}

/// Service for managing a user's medicines.
pub struct ScheduleService<S>
where
    S: Storage,
{
    storage: Arc<S>,
}

impl<S> ScheduleService<S>
where
    S: Storage,
    S::Error: Into<StorageError>,
{
    /// Create a new schedule service.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Add a medicine for the session's user.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn add(
        &self,
        session: &Session,
        name: &str,
        dosage: &str,
        time: &str,
    ) -> Result<AddMedicine> {
        let input = NewMedicine::new(name, dosage, time);
        if input.validate().is_err() {
            return Ok(AddMedicine::MissingFields);
        }

        let id = self
            .storage
            .add_medicine(session.user_id, &input.name, &input.dosage, &input.time)
            .map_err(|e| MedischedulerError::Storage(e.into()))?;

        Ok(AddMedicine::Added(id))
    }

    /// All medicines of the session's user.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn list(&self, session: &Session) -> Result<Vec<Medicine>> {
        self.storage
            .list_medicines(session.user_id)
            .map_err(|e| MedischedulerError::Storage(e.into()))
    }

    /// Delete the selected medicine, if any.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn delete(&self, selection: Option<MedicineId>) -> Result<DeleteMedicine> {
        let Some(id) = selection else {
            return Ok(DeleteMedicine::NothingSelected);
        };

        self.storage
            .delete_medicine(id)
            .map_err(|e| MedischedulerError::Storage(e.into()))?;

        Ok(DeleteMedicine::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteStorage;
    use crate::application::{AccountService, LogIn};

    fn signed_in(storage: &Arc<SqliteStorage>, username: &str) -> Session {
        let accounts = AccountService::new(storage.clone());
        accounts.sign_up(username, "x@x.com", "pw").expect("Should sign up");
        match accounts.log_in(username, "pw").expect("Should log in") {
            LogIn::Authenticated(session) => session,
            other => panic!("Expected session, got {other:?}"),
        }
    }

    #[test]
    fn test_add_list_delete() {
        let storage = Arc::new(SqliteStorage::in_memory().expect("Should create db"));
        let session = signed_in(&storage, "alice");
        let schedule = ScheduleService::new(storage);

        let AddMedicine::Added(id) = schedule
            .add(&session, " Aspirin ", "1 pill", "8:00 AM")
            .expect("Should add")
        else {
            panic!("Expected medicine to be added");
        };

        let listed = schedule.list(&session).expect("Should list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].name, "Aspirin");

        assert_eq!(schedule.delete(Some(id)).expect("Should delete"), DeleteMedicine::Deleted);
        assert!(schedule.list(&session).expect("Should list").is_empty());
    }

    #[test]
    fn test_add_requires_all_fields() {
        let storage = Arc::new(SqliteStorage::in_memory().expect("Should create db"));
        let session = signed_in(&storage, "alice");
        let schedule = ScheduleService::new(storage);

        let outcome = schedule.add(&session, "Aspirin", "", "8:00 AM").expect("Should not error");
        assert_eq!(outcome, AddMedicine::MissingFields);
        assert_eq!(outcome.message(), "Please fill all fields.");
        assert!(schedule.list(&session).expect("Should list").is_empty());
    }

    #[test]
    fn test_delete_without_selection() {
        let storage = Arc::new(SqliteStorage::in_memory().expect("Should create db"));
        let schedule = ScheduleService::new(storage);

        let outcome = schedule.delete(None).expect("Should not error");
        assert_eq!(outcome, DeleteMedicine::NothingSelected);
        assert_eq!(outcome.message(), "Please select a medicine to delete.");
    }
}
