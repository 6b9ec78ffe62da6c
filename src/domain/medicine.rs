//! Medication schedule entries.

use std::fmt;

use super::UserId;

/// Database identifier of a medicine entry (auto-assigned, never reused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MedicineId(pub i64);

impl fmt::Display for MedicineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A medicine on a user's schedule.
///
/// `time` is a free-text label ("8:00 AM", "after lunch") and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medicine {
    pub id: MedicineId,
    pub user_id: UserId,
    pub name: String,
    pub dosage: String,
    pub time: String,
}

/// Dashboard form input for a new medicine, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicine {
    pub name: String,
    pub dosage: String,
    pub time: String,
}

impl NewMedicine {
    #[must_use]
    pub fn new(name: &str, dosage: &str, time: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            dosage: dosage.trim().to_string(),
            time: time.trim().to_string(),
        }
    }

    /// Check that every field is present.
    ///
    /// # Errors
    /// Returns the labels of the empty fields.
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let mut missing = Vec::new();

        if self.name.is_empty() {
            missing.push("name");
        }
        if self.dosage.is_empty() {
            missing.push("dosage");
        }
        if self.time.is_empty() {
            missing.push("time");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}
