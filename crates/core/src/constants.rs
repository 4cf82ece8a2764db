//! Constants used throughout the triage core crate.
//!
//! This module contains defaults and fixed values shared across the
//! codebase to ensure consistency and make maintenance easier.

/// Default listen address for the REST server when none is configured.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default clinic name shown on the intake form.
pub const DEFAULT_CLINIC_NAME: &str = "Community Clinic";

/// Default path of the patient detail view the submission redirects to.
pub const DEFAULT_PATIENT_DETAIL_PATH: &str = "/show";

/// Sentinel recorded for a vital field the user left blank.
///
/// Sentinel-valued records are never persisted; the write path keeps only
/// strictly positive values.
pub const MISSING_VITAL_SENTINEL: f64 = -1.0;

/// Number of vital-sign types in the fixed catalog.
pub const VITAL_SIGN_COUNT: usize = 9;
