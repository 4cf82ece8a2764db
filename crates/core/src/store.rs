//! In-memory reference implementation of the triage service seams.
//!
//! Durable persistence and the session store belong to the hosting
//! application; this store stands in for them in the server binary and in
//! tests. It keeps patients, encounters, and vitals in `Mutex`-guarded
//! collections, assigns sequential positive ids on creation, and serves
//! the fixed vital catalog.

use crate::encounter::{Encounter, EncounterVital};
use crate::error::{ServiceError, ServiceResult};
use crate::patient::Patient;
use crate::services::{
    PatientLookupService, SessionProvider, TriageIntakeService, VitalCatalogService,
};
use crate::session::CurrentUser;
use crate::vitals::{vital_catalog, Vital};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct StoreInner {
    next_patient_id: i32,
    next_encounter_id: i32,
    patients: HashMap<i32, Patient>,
    encounters: Vec<Encounter>,
    encounter_vitals: Vec<EncounterVital>,
}

/// In-memory store implementing all four service seams.
#[derive(Debug)]
pub struct InMemoryStore {
    current_user: CurrentUser,
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    /// Creates an empty store acting on behalf of the given session user.
    pub fn new(current_user: CurrentUser) -> Self {
        Self {
            current_user,
            inner: Mutex::new(StoreInner {
                next_patient_id: 1,
                next_encounter_id: 1,
                patients: HashMap::new(),
                encounters: Vec::new(),
                encounter_vitals: Vec::new(),
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, StoreInner> {
        // A poisoned lock only means a panicking test thread; the data is
        // plain collections, safe to keep using.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seeds an existing patient, assigning its id. Returns the stored copy.
    pub fn insert_patient(&self, patient: Patient) -> Patient {
        let mut inner = self.locked();
        let id = inner.next_patient_id;
        inner.next_patient_id += 1;
        let stored = Patient { id, ..patient };
        inner.patients.insert(id, stored.clone());
        stored
    }

    pub fn patient_count(&self) -> usize {
        self.locked().patients.len()
    }

    pub fn encounters_for_patient(&self, patient_id: i32) -> Vec<Encounter> {
        self.locked()
            .encounters
            .iter()
            .filter(|e| e.patient_id == patient_id)
            .cloned()
            .collect()
    }

    pub fn vitals_for_encounter(&self, encounter_id: i32) -> Vec<EncounterVital> {
        self.locked()
            .encounter_vitals
            .iter()
            .filter(|v| v.encounter_id == encounter_id)
            .cloned()
            .collect()
    }
}

impl SessionProvider for InMemoryStore {
    fn current_user(&self) -> ServiceResult<CurrentUser> {
        Ok(self.current_user.clone())
    }
}

impl PatientLookupService for InMemoryStore {
    fn find_patient_by_id(&self, id: i32) -> ServiceResult<Patient> {
        self.locked()
            .patients
            .get(&id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }
}

impl VitalCatalogService for InMemoryStore {
    fn find_all_vitals(&self) -> ServiceResult<Vec<Vital>> {
        Ok(vital_catalog())
    }
}

impl TriageIntakeService for InMemoryStore {
    fn create_patient(&self, patient: Patient) -> ServiceResult<Patient> {
        Ok(self.insert_patient(patient))
    }

    fn create_encounter(&self, encounter: Encounter) -> ServiceResult<Encounter> {
        let mut inner = self.locked();
        let id = inner.next_encounter_id;
        inner.next_encounter_id += 1;
        let stored = Encounter { id, ..encounter };
        inner.encounters.push(stored.clone());
        Ok(stored)
    }

    fn create_encounter_vital(&self, vital: EncounterVital) -> ServiceResult<()> {
        self.locked().encounter_vitals.push(vital);
        Ok(())
    }
}
