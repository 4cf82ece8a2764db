//! # Triage Core
//!
//! Core business logic for the clinic triage-intake service.
//!
//! This crate contains the intake domain and orchestration:
//! - Patient, encounter, and vital entities
//! - The fixed vital-sign catalog and the vitals population routine
//! - Form parsing and form-to-entity mapping
//! - The intake workflow the HTTP handlers delegate to
//! - Trait seams for the external collaborators (session, lookup, catalog,
//!   persistence) plus an in-memory reference implementation
//!
//! **No API concerns**: HTTP routing, extraction, and view rendering belong
//! in `api-rest`.

pub mod config;
pub mod constants;
pub mod encounter;
pub mod error;
pub mod forms;
pub mod intake;
pub mod mapper;
pub mod patient;
pub mod services;
pub mod session;
pub mod store;
pub mod vitals;

pub use config::CoreConfig;
pub use encounter::{Encounter, EncounterVital};
pub use error::{ServiceError, ServiceResult, TriageError, TriageResult};
pub use forms::TriageFormData;
pub use intake::{IntakeOutcome, IntakeWorkflow, PrefillViewModel, TriageFormView};
pub use mapper::TriageFormMapper;
pub use patient::{age_in_years, Patient, Sex};
pub use services::{
    PatientLookupService, SessionProvider, TriageIntakeService, VitalCatalogService,
};
pub use session::CurrentUser;
pub use store::InMemoryStore;
pub use vitals::{populate_encounter_vitals, vital_catalog, Vital, VitalSign};

// Re-export the validated text primitives so downstream crates don't need a
// direct triage-types dependency for common cases.
pub use triage_types::{NonEmptyText, TextError};
