//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::error::{TriageError, TriageResult};
use triage_types::NonEmptyText;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    clinic_name: NonEmptyText,
    patient_detail_path: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The patient detail path is the target of the post-submission
    /// redirect. It must be absolute and must not carry a query or fragment;
    /// the patient id query parameter is appended per request.
    pub fn new(
        clinic_name: NonEmptyText,
        patient_detail_path: impl Into<String>,
    ) -> TriageResult<Self> {
        let patient_detail_path = patient_detail_path.into();

        if !patient_detail_path.starts_with('/') {
            return Err(TriageError::InvalidInput(
                "patient_detail_path must be an absolute path".into(),
            ));
        }
        if patient_detail_path.contains(['?', '#']) {
            return Err(TriageError::InvalidInput(
                "patient_detail_path must not contain a query or fragment".into(),
            ));
        }

        Ok(Self {
            clinic_name,
            patient_detail_path,
        })
    }

    pub fn clinic_name(&self) -> &NonEmptyText {
        &self.clinic_name
    }

    pub fn patient_detail_path(&self) -> &str {
        &self.patient_detail_path
    }

    /// Builds the detail-view URL for the given patient id.
    pub fn patient_detail_url(&self, patient_id: i32) -> String {
        format!("{}?id={}", self.patient_detail_path, patient_id)
    }
}
