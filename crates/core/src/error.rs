//! Error taxonomy for the triage intake workflow.
//!
//! Collaborating services (session, lookup, catalog, persistence) report
//! failures through [`ServiceError`]; the intake workflow wraps those in
//! [`TriageError`] variants that name the failed step. All failures are
//! request-scoped; nothing here is fatal to the process.

/// Failure reported by a collaborating service.
///
/// Service calls return a result-or-error wrapper; no panics cross the
/// service boundary.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("record not found")]
    NotFound,
    #[error("backing service unavailable: {0}")]
    Unavailable(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to resolve session user: {0}")]
    Session(ServiceError),
    #[error("patient {0} not found")]
    PatientNotFound(i32),
    #[error("failed to create patient: {0}")]
    PatientCreate(ServiceError),
    #[error("failed to look up patient {id}: {source}")]
    PatientLookup {
        id: i32,
        #[source]
        source: ServiceError,
    },
    #[error("failed to create encounter: {0}")]
    EncounterCreate(ServiceError),
    #[error("failed to record vital {vital_id}: {source}")]
    VitalCreate {
        vital_id: i32,
        #[source]
        source: ServiceError,
    },
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
