//! Encounter and encounter-vital entities.
//!
//! One encounter is one clinical visit tied to a patient. Vitals recorded
//! during triage hang off the encounter as individual measurement rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One clinical visit record tied to a patient.
///
/// `id` is 0 until the record has been persisted. Encounters are created
/// once at intake and never mutated by this component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: i32,
    pub patient_id: i32,
    /// Id of the user who registered the visit.
    pub user_id: i32,
    pub chief_complaint: Option<String>,
    pub date_of_visit: DateTime<Utc>,
}

/// One measurement of one vital type taken during one encounter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterVital {
    pub encounter_id: i32,
    /// Catalog id of the measured vital type (1-based).
    pub vital_id: i32,
    pub value: f64,
    /// Id of the user who recorded the measurement.
    pub user_id: i32,
    pub taken_at: DateTime<Utc>,
}

impl EncounterVital {
    /// Whether this measurement should be persisted.
    ///
    /// Only strictly positive values are written; the missing-input sentinel
    /// and zero readings are dropped on the write path.
    pub fn is_recordable(&self) -> bool {
        self.value > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MISSING_VITAL_SENTINEL;

    fn vital(value: f64) -> EncounterVital {
        EncounterVital {
            encounter_id: 1,
            vital_id: 2,
            value,
            user_id: 1,
            taken_at: Utc::now(),
        }
    }

    #[test]
    fn positive_values_are_recordable() {
        assert!(vital(72.0).is_recordable());
        assert!(vital(0.5).is_recordable());
    }

    #[test]
    fn sentinel_zero_and_negative_values_are_not_recordable() {
        assert!(!vital(MISSING_VITAL_SENTINEL).is_recordable());
        assert!(!vital(0.0).is_recordable());
        assert!(!vital(-3.0).is_recordable());
    }
}
