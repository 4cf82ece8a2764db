//! Form-to-entity mapping for triage intake.
//!
//! Converts the parsed form payload plus current-user context into the
//! domain entities handed to the persistence seam. Mapping happens before
//! any write, so a validation failure here aborts the submission with no
//! side effects.

use crate::encounter::Encounter;
use crate::error::{TriageError, TriageResult};
use crate::forms::TriageFormData;
use crate::patient::{Patient, Sex};
use crate::session::CurrentUser;
use chrono::{DateTime, Utc};
use triage_types::NonEmptyText;

pub struct TriageFormMapper;

impl TriageFormMapper {
    /// Builds a new, unpersisted patient (id 0) from the submitted form.
    ///
    /// First and last name are required on a new-patient submission; a sex
    /// value, when present, must be a recognised code.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if a required name is missing or
    /// the sex value is unrecognised.
    pub fn patient_from_form(form: &TriageFormData) -> TriageResult<Patient> {
        let first_name = NonEmptyText::new(form.first_name.as_deref().unwrap_or_default())
            .map_err(|_| TriageError::InvalidInput("first_name is required".into()))?;
        let last_name = NonEmptyText::new(form.last_name.as_deref().unwrap_or_default())
            .map_err(|_| TriageError::InvalidInput("last_name is required".into()))?;

        let sex = match form.sex.as_deref() {
            None => None,
            Some(raw) => Some(Sex::from_wire(raw).ok_or_else(|| {
                TriageError::InvalidInput(format!("unrecognised sex value: {raw}"))
            })?),
        };

        Ok(Patient {
            id: 0,
            first_name: first_name.into_string(),
            last_name: last_name.into_string(),
            birth_date: form.birth_date,
            sex,
            address: form.address.clone(),
            city: form.city.clone(),
        })
    }

    /// Builds a new, unpersisted encounter (id 0) for the resolved patient.
    ///
    /// The encounter carries the chief complaint from the form and is
    /// stamped with the acting user and the visit timestamp.
    pub fn encounter_from_form(
        form: &TriageFormData,
        user: &CurrentUser,
        patient: &Patient,
        date_of_visit: DateTime<Utc>,
    ) -> Encounter {
        Encounter {
            id: 0,
            patient_id: patient.id,
            user_id: user.id,
            chief_complaint: form.chief_complaint.clone(),
            date_of_visit,
        }
    }
}
