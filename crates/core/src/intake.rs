//! Triage intake orchestration.
//!
//! The REST handlers delegate here. The workflow owns the injected service
//! seams and implements the three intake operations: the blank form, the
//! submission, and the prefilled form for a returning patient. It renders
//! nothing itself; each operation produces a view model or an outcome for
//! the HTTP layer to turn into a response.

use crate::config::CoreConfig;
use crate::error::{ServiceError, TriageError, TriageResult};
use crate::forms::TriageFormData;
use crate::mapper::TriageFormMapper;
use crate::patient::{age_in_years, Patient, Sex};
use crate::services::{
    PatientLookupService, SessionProvider, TriageIntakeService, VitalCatalogService,
};
use crate::session::CurrentUser;
use crate::vitals::{populate_encounter_vitals, Vital};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

/// View model backing the intake form template.
#[derive(Clone, Debug, Serialize)]
pub struct TriageFormView {
    pub current_user: CurrentUser,
    pub vitals: Vec<Vital>,
    pub error: bool,
    /// The patient the form is for: blank (id 0) on the empty form, the
    /// resolved patient on a successful prefill.
    pub patient: Patient,
    pub prefill: Option<PrefillViewModel>,
}

/// Pre-filled form values for a returning patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrefillViewModel {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    /// Whole years between the birth date and today.
    pub age_years: Option<u32>,
    pub sex: Option<Sex>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl PrefillViewModel {
    fn from_patient(patient: &Patient, today: NaiveDate) -> Self {
        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            birth_date: patient.birth_date,
            age_years: patient.birth_date.and_then(|birth| age_in_years(birth, today)),
            sex: patient.sex,
            address: patient.address.clone(),
            city: patient.city.clone(),
        }
    }
}

/// Outcome of a successful intake submission.
#[derive(Clone, Debug, PartialEq)]
pub struct IntakeOutcome {
    pub patient_id: i32,
    pub encounter_id: i32,
    /// Number of vitals that passed the positive-value filter and were
    /// persisted.
    pub vitals_recorded: usize,
    /// Detail-view URL the client is redirected to.
    pub redirect_to: String,
}

/// Per-request triage orchestration over the injected service seams.
pub struct IntakeWorkflow {
    cfg: Arc<CoreConfig>,
    session: Arc<dyn SessionProvider>,
    lookup: Arc<dyn PatientLookupService>,
    catalog: Arc<dyn VitalCatalogService>,
    intake: Arc<dyn TriageIntakeService>,
}

impl IntakeWorkflow {
    pub fn new(
        cfg: Arc<CoreConfig>,
        session: Arc<dyn SessionProvider>,
        lookup: Arc<dyn PatientLookupService>,
        catalog: Arc<dyn VitalCatalogService>,
        intake: Arc<dyn TriageIntakeService>,
    ) -> Self {
        Self {
            cfg,
            session,
            lookup,
            catalog,
            intake,
        }
    }

    /// The blank intake form (read path).
    ///
    /// A catalog failure degrades the view (empty list, error flag set)
    /// instead of failing the request; the form is still rendered.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Session` if the acting user cannot be resolved.
    pub fn blank_form(&self) -> TriageResult<TriageFormView> {
        let current_user = self.session.current_user().map_err(TriageError::Session)?;
        let (vitals, error) = self.fetch_catalog();

        Ok(TriageFormView {
            current_user,
            vitals,
            error,
            patient: Patient::blank(),
            prefill: None,
        })
    }

    /// Intake submission (write path).
    ///
    /// `patient_id` 0 registers a new patient from the form; a positive id
    /// reuses the existing patient. Either way one encounter is created,
    /// then the nine vital candidates are built and only the strictly
    /// positive ones persisted. Patient and encounter writes always precede
    /// vital writes.
    ///
    /// # Errors
    ///
    /// A session, mapping, creation, or lookup failure aborts the
    /// submission before any dependent write.
    pub fn submit(&self, patient_id: i32, form: &TriageFormData) -> TriageResult<IntakeOutcome> {
        let current_user = self.session.current_user().map_err(TriageError::Session)?;

        let patient = if patient_id == 0 {
            let patient = TriageFormMapper::patient_from_form(form)?;
            self.intake
                .create_patient(patient)
                .map_err(TriageError::PatientCreate)?
        } else {
            self.lookup
                .find_patient_by_id(patient_id)
                .map_err(|source| match source {
                    ServiceError::NotFound => TriageError::PatientNotFound(patient_id),
                    other => TriageError::PatientLookup {
                        id: patient_id,
                        source: other,
                    },
                })?
        };

        let encounter =
            TriageFormMapper::encounter_from_form(form, &current_user, &patient, Utc::now());
        let encounter = self
            .intake
            .create_encounter(encounter)
            .map_err(TriageError::EncounterCreate)?;

        let candidates =
            populate_encounter_vitals(form, &current_user, encounter.id, Utc::now());
        let mut vitals_recorded = 0;
        for vital in candidates.into_iter().filter(|v| v.is_recordable()) {
            let vital_id = vital.vital_id;
            self.intake
                .create_encounter_vital(vital)
                .map_err(|source| TriageError::VitalCreate { vital_id, source })?;
            vitals_recorded += 1;
        }

        tracing::info!(
            patient_id = patient.id,
            encounter_id = encounter.id,
            vitals_recorded,
            "triage intake recorded"
        );

        Ok(IntakeOutcome {
            patient_id: patient.id,
            encounter_id: encounter.id,
            vitals_recorded,
            redirect_to: self.cfg.patient_detail_url(patient.id),
        })
    }

    /// The intake form prefilled from an existing patient.
    ///
    /// A missing, blank, or unparsable id, and a failed lookup, all render
    /// the blank form with the error flag set; none of them fail the
    /// request. On success the view carries the resolved patient and the
    /// prefill values, error flag clear.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Session` if the acting user cannot be resolved.
    pub fn prefilled_form(&self, raw_id: Option<&str>) -> TriageResult<TriageFormView> {
        let current_user = self.session.current_user().map_err(TriageError::Session)?;
        // The prefill outcome decides the flag: every fallback to the blank
        // form reports an error, and a successful prefill clears it even if
        // the catalog fetch degraded.
        let (vitals, _) = self.fetch_catalog();

        let blank_with_error = |current_user: CurrentUser, vitals: Vec<Vital>| TriageFormView {
            current_user,
            vitals,
            error: true,
            patient: Patient::blank(),
            prefill: None,
        };

        let raw_id = raw_id.map(str::trim).unwrap_or_default();
        if raw_id.is_empty() {
            return Ok(blank_with_error(current_user, vitals));
        }

        let id: i32 = match raw_id.parse() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!("prefill requested with unparsable patient id: {raw_id:?}");
                return Ok(blank_with_error(current_user, vitals));
            }
        };

        match self.lookup.find_patient_by_id(id) {
            Err(e) => {
                tracing::warn!("prefill lookup failed for patient {id}: {e}");
                Ok(blank_with_error(current_user, vitals))
            }
            Ok(patient) => {
                let today = Utc::now().date_naive();
                let prefill = PrefillViewModel::from_patient(&patient, today);
                Ok(TriageFormView {
                    current_user,
                    vitals,
                    error: false,
                    patient,
                    prefill: Some(prefill),
                })
            }
        }
    }

    fn fetch_catalog(&self) -> (Vec<Vital>, bool) {
        match self.catalog.find_all_vitals() {
            Ok(vitals) => (vitals, false),
            Err(e) => {
                tracing::warn!("vital catalog unavailable: {e}");
                (Vec::new(), true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MISSING_VITAL_SENTINEL, VITAL_SIGN_COUNT};
    use crate::error::ServiceResult;
    use crate::store::InMemoryStore;
    use triage_types::NonEmptyText;

    fn nurse() -> CurrentUser {
        CurrentUser {
            id: 1,
            first_name: "Triage".into(),
            last_name: "Nurse".into(),
        }
    }

    fn cfg() -> Arc<CoreConfig> {
        Arc::new(
            CoreConfig::new(
                NonEmptyText::new("Test Clinic").expect("clinic name should be valid"),
                "/show",
            )
            .expect("config should be valid"),
        )
    }

    fn workflow_over(store: &Arc<InMemoryStore>) -> IntakeWorkflow {
        IntakeWorkflow::new(
            cfg(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        )
    }

    fn new_patient_form() -> TriageFormData {
        TriageFormData {
            first_name: Some("Ana".into()),
            last_name: Some("Diaz".into()),
            sex: Some("F".into()),
            ..TriageFormData::default()
        }
    }

    struct FailingCatalog;

    impl VitalCatalogService for FailingCatalog {
        fn find_all_vitals(&self) -> ServiceResult<Vec<Vital>> {
            Err(ServiceError::Unavailable("catalog offline".into()))
        }
    }

    struct NoSession;

    impl SessionProvider for NoSession {
        fn current_user(&self) -> ServiceResult<CurrentUser> {
            Err(ServiceError::Unavailable("no session".into()))
        }
    }

    #[test]
    fn blank_form_seeds_unpersisted_patient_and_catalog() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let view = workflow_over(&store)
            .blank_form()
            .expect("blank form should render");

        assert!(!view.error);
        assert_eq!(view.patient.id, 0);
        assert_eq!(view.vitals.len(), VITAL_SIGN_COUNT);
        assert_eq!(view.prefill, None);
        assert_eq!(view.current_user, nurse());
    }

    #[test]
    fn blank_form_degrades_when_catalog_is_unavailable() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let workflow = IntakeWorkflow::new(
            cfg(),
            store.clone(),
            store.clone(),
            Arc::new(FailingCatalog),
            store,
        );

        let view = workflow.blank_form().expect("form should still render");

        assert!(view.error, "catalog failure should set the error flag");
        assert!(view.vitals.is_empty());
        assert_eq!(view.patient.id, 0);
    }

    #[test]
    fn blank_form_fails_without_a_session_user() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let workflow = IntakeWorkflow::new(
            cfg(),
            Arc::new(NoSession),
            store.clone(),
            store.clone(),
            store,
        );

        let err = workflow
            .blank_form()
            .expect_err("missing session should abort");
        assert!(matches!(err, TriageError::Session(_)));
    }

    #[test]
    fn submit_with_id_zero_creates_patient_encounter_and_redirect() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let outcome = workflow_over(&store)
            .submit(0, &new_patient_form())
            .expect("submission should succeed");

        assert_eq!(store.patient_count(), 1);
        assert_eq!(outcome.patient_id, 1);
        assert_eq!(store.encounters_for_patient(1).len(), 1);
        assert_eq!(outcome.redirect_to, "/show?id=1");
    }

    #[test]
    fn submit_with_existing_id_reuses_patient() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let existing = store.insert_patient(Patient {
            first_name: "Ben".into(),
            last_name: "Okafor".into(),
            ..Patient::blank()
        });

        let outcome = workflow_over(&store)
            .submit(existing.id, &TriageFormData::default())
            .expect("submission should succeed");

        assert_eq!(store.patient_count(), 1, "no new patient should be created");
        assert_eq!(outcome.patient_id, existing.id);
        assert_eq!(store.encounters_for_patient(existing.id).len(), 1);
    }

    #[test]
    fn submit_aborts_when_patient_is_unknown() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let err = workflow_over(&store)
            .submit(404, &TriageFormData::default())
            .expect_err("unknown patient should abort");

        assert!(matches!(err, TriageError::PatientNotFound(404)));
        assert_eq!(
            store.encounters_for_patient(404).len(),
            0,
            "no encounter should be written after a failed lookup"
        );
    }

    #[test]
    fn submit_aborts_when_new_patient_form_is_invalid() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let err = workflow_over(&store)
            .submit(0, &TriageFormData::default())
            .expect_err("missing names should abort");

        assert!(matches!(err, TriageError::InvalidInput(_)));
        assert_eq!(store.patient_count(), 0);
    }

    #[test]
    fn submit_with_all_vitals_blank_persists_none() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let outcome = workflow_over(&store)
            .submit(0, &new_patient_form())
            .expect("submission should succeed");

        assert_eq!(outcome.vitals_recorded, 0);
        assert!(store.vitals_for_encounter(outcome.encounter_id).is_empty());
    }

    #[test]
    fn submit_persists_only_positive_vitals() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let form = TriageFormData {
            heart_rate: Some(72.0),
            respiratory_rate: Some(0.0),
            temperature: Some(-2.0),
            weight: Some(150.5),
            ..new_patient_form()
        };

        let outcome = workflow_over(&store)
            .submit(0, &form)
            .expect("submission should succeed");

        let persisted = store.vitals_for_encounter(outcome.encounter_id);
        assert_eq!(outcome.vitals_recorded, 2);
        assert_eq!(persisted.len(), 2);
        assert!(persisted.iter().all(|v| v.value > 0.0));
        assert!(persisted.iter().any(|v| v.vital_id == 2 && v.value == 72.0));
        assert!(persisted
            .iter()
            .any(|v| v.vital_id == 7 && v.value == 150.5));
    }

    #[test]
    fn persisted_vitals_share_timestamp_encounter_and_user() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let form = TriageFormData {
            heart_rate: Some(72.0),
            oxygen_saturation: Some(98.0),
            blood_pressure_systolic: Some(120.0),
            ..new_patient_form()
        };

        let outcome = workflow_over(&store)
            .submit(0, &form)
            .expect("submission should succeed");

        let persisted = store.vitals_for_encounter(outcome.encounter_id);
        assert_eq!(persisted.len(), 3);
        let taken_at = persisted[0].taken_at;
        assert!(persisted.iter().all(|v| v.taken_at == taken_at));
        assert!(persisted
            .iter()
            .all(|v| v.encounter_id == outcome.encounter_id));
        assert!(persisted.iter().all(|v| v.user_id == nurse().id));
    }

    #[test]
    fn heart_rate_only_submission_records_exactly_one_vital() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let form = TriageFormData {
            heart_rate: Some(72.0),
            ..new_patient_form()
        };

        let outcome = workflow_over(&store)
            .submit(0, &form)
            .expect("submission should succeed");

        assert_eq!(store.patient_count(), 1);
        assert_eq!(store.encounters_for_patient(outcome.patient_id).len(), 1);
        let persisted = store.vitals_for_encounter(outcome.encounter_id);
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].vital_id, 2);
        assert_eq!(persisted[0].value, 72.0);
        assert!(persisted[0].value != MISSING_VITAL_SENTINEL);
    }

    #[test]
    fn prefilled_form_populates_from_existing_patient() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let existing = store.insert_patient(Patient {
            first_name: "Maya".into(),
            last_name: "Kone".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
            sex: Some(Sex::Female),
            address: Some("4 River Rd".into()),
            city: Some("Hilltown".into()),
            ..Patient::blank()
        });

        let view = workflow_over(&store)
            .prefilled_form(Some(&existing.id.to_string()))
            .expect("prefill should render");

        assert!(!view.error);
        assert_eq!(view.patient.id, existing.id);
        let prefill = view.prefill.expect("prefill values should be present");
        assert_eq!(prefill.first_name, "Maya");
        assert_eq!(prefill.last_name, "Kone");
        assert_eq!(prefill.sex, Some(Sex::Female));
        assert_eq!(prefill.address.as_deref(), Some("4 River Rd"));
        assert_eq!(prefill.city.as_deref(), Some("Hilltown"));
        assert_eq!(prefill.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));

        let expected_age = age_in_years(
            NaiveDate::from_ymd_opt(1990, 1, 1).expect("test date should be valid"),
            Utc::now().date_naive(),
        );
        assert_eq!(prefill.age_years, expected_age);
    }

    #[test]
    fn prefilled_form_success_clears_error_even_with_degraded_catalog() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let existing = store.insert_patient(Patient {
            first_name: "Lena".into(),
            last_name: "Mori".into(),
            ..Patient::blank()
        });
        let workflow = IntakeWorkflow::new(
            cfg(),
            store.clone(),
            store.clone(),
            Arc::new(FailingCatalog),
            store,
        );

        let view = workflow
            .prefilled_form(Some(&existing.id.to_string()))
            .expect("prefill should render");

        assert!(!view.error, "a successful prefill reports no error");
        assert!(view.vitals.is_empty());
        assert!(view.prefill.is_some());
    }

    #[test]
    fn prefilled_form_with_missing_id_renders_blank_with_error() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let view = workflow_over(&store)
            .prefilled_form(None)
            .expect("blank form should render");

        assert!(view.error);
        assert_eq!(view.patient.id, 0);
        assert_eq!(view.prefill, None);
    }

    #[test]
    fn prefilled_form_with_blank_id_renders_blank_with_error() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let view = workflow_over(&store)
            .prefilled_form(Some("   "))
            .expect("blank form should render");

        assert!(view.error);
        assert_eq!(view.prefill, None);
    }

    #[test]
    fn prefilled_form_with_unparsable_id_renders_blank_with_error() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let view = workflow_over(&store)
            .prefilled_form(Some("forty-two"))
            .expect("malformed id should not fail the request");

        assert!(view.error);
        assert_eq!(view.prefill, None);
    }

    #[test]
    fn prefilled_form_with_unknown_patient_renders_blank_with_error() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let view = workflow_over(&store)
            .prefilled_form(Some("999"))
            .expect("failed lookup should not fail the request");

        assert!(view.error);
        assert_eq!(view.patient.id, 0);
        assert_eq!(view.prefill, None);
    }

    #[test]
    fn prefilled_form_trims_the_raw_id() {
        let store = Arc::new(InMemoryStore::new(nurse()));
        let existing = store.insert_patient(Patient {
            first_name: "Idris".into(),
            last_name: "Bello".into(),
            ..Patient::blank()
        });

        let view = workflow_over(&store)
            .prefilled_form(Some(&format!("  {} ", existing.id)))
            .expect("prefill should render");

        assert!(!view.error);
        assert_eq!(view.patient.id, existing.id);
    }
}
