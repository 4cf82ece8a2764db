//! Service seams consumed by the intake workflow.
//!
//! Session lookup, patient search, the vital catalog, and persistence are
//! external collaborators. They are injected into the workflow as explicit
//! trait objects at construction time, so handlers carry no global state
//! and tests can substitute failing or in-memory implementations. Calls
//! are synchronous and atomic; each returns a result-or-error wrapper and
//! never panics across the boundary.

use crate::encounter::{Encounter, EncounterVital};
use crate::error::ServiceResult;
use crate::patient::Patient;
use crate::session::CurrentUser;
use crate::vitals::Vital;

/// Resolves the authenticated acting user for the current request.
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> ServiceResult<CurrentUser>;
}

/// Resolves patients by identifier.
pub trait PatientLookupService: Send + Sync {
    fn find_patient_by_id(&self, id: i32) -> ServiceResult<Patient>;
}

/// Enumerates the fixed catalog of known vital types.
pub trait VitalCatalogService: Send + Sync {
    fn find_all_vitals(&self) -> ServiceResult<Vec<Vital>>;
}

/// Persists the records produced by a triage intake.
pub trait TriageIntakeService: Send + Sync {
    /// Persists a new patient and returns it with its assigned id.
    fn create_patient(&self, patient: Patient) -> ServiceResult<Patient>;

    /// Persists a new encounter and returns it with its assigned id.
    fn create_encounter(&self, encounter: Encounter) -> ServiceResult<Encounter>;

    /// Persists one vital measurement for an encounter.
    fn create_encounter_vital(&self, vital: EncounterVital) -> ServiceResult<()>;
}
