//! Vital-sign catalog and the encounter-vitals population routine.
//!
//! The clinic recognises a fixed set of nine vital-sign types. Their
//! catalog ids are positional (1 through 9) and pre-seeded wherever vitals
//! are stored, so the enumeration here is the single place that defines
//! both the ordering and the id mapping. Each variant also knows which form
//! field carries its submitted value, which keeps the population routine a
//! pure table walk.

use crate::constants::MISSING_VITAL_SENTINEL;
use crate::encounter::EncounterVital;
use crate::forms::TriageFormData;
use crate::session::CurrentUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The recognised vital-sign types, in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VitalSign {
    RespiratoryRate,
    HeartRate,
    Temperature,
    OxygenSaturation,
    HeightFeet,
    HeightInches,
    Weight,
    BloodPressureSystolic,
    BloodPressureDiastolic,
}

impl VitalSign {
    /// All vital signs in catalog order. The array position + 1 is the
    /// catalog id returned by [`VitalSign::vital_id`].
    pub const ALL: [VitalSign; 9] = [
        VitalSign::RespiratoryRate,
        VitalSign::HeartRate,
        VitalSign::Temperature,
        VitalSign::OxygenSaturation,
        VitalSign::HeightFeet,
        VitalSign::HeightInches,
        VitalSign::Weight,
        VitalSign::BloodPressureSystolic,
        VitalSign::BloodPressureDiastolic,
    ];

    /// Pre-seeded catalog id of this vital type.
    pub fn vital_id(self) -> i32 {
        match self {
            VitalSign::RespiratoryRate => 1,
            VitalSign::HeartRate => 2,
            VitalSign::Temperature => 3,
            VitalSign::OxygenSaturation => 4,
            VitalSign::HeightFeet => 5,
            VitalSign::HeightInches => 6,
            VitalSign::Weight => 7,
            VitalSign::BloodPressureSystolic => 8,
            VitalSign::BloodPressureDiastolic => 9,
        }
    }

    /// Human-readable catalog name.
    pub fn name(self) -> &'static str {
        match self {
            VitalSign::RespiratoryRate => "Respiratory Rate",
            VitalSign::HeartRate => "Heart Rate",
            VitalSign::Temperature => "Temperature",
            VitalSign::OxygenSaturation => "Oxygen Saturation",
            VitalSign::HeightFeet => "Height (Feet)",
            VitalSign::HeightInches => "Height (Inches)",
            VitalSign::Weight => "Weight",
            VitalSign::BloodPressureSystolic => "Blood Pressure (Systolic)",
            VitalSign::BloodPressureDiastolic => "Blood Pressure (Diastolic)",
        }
    }

    /// Measurement unit recorded in the catalog.
    pub fn unit(self) -> &'static str {
        match self {
            VitalSign::RespiratoryRate => "breaths/min",
            VitalSign::HeartRate => "beats/min",
            VitalSign::Temperature => "degrees Fahrenheit",
            VitalSign::OxygenSaturation => "%",
            VitalSign::HeightFeet => "ft",
            VitalSign::HeightInches => "in",
            VitalSign::Weight => "lbs",
            VitalSign::BloodPressureSystolic => "mmHg",
            VitalSign::BloodPressureDiastolic => "mmHg",
        }
    }

    /// Resolves a catalog id back to its vital sign.
    pub fn from_vital_id(id: i32) -> Option<VitalSign> {
        match id {
            1 => Some(VitalSign::RespiratoryRate),
            2 => Some(VitalSign::HeartRate),
            3 => Some(VitalSign::Temperature),
            4 => Some(VitalSign::OxygenSaturation),
            5 => Some(VitalSign::HeightFeet),
            6 => Some(VitalSign::HeightInches),
            7 => Some(VitalSign::Weight),
            8 => Some(VitalSign::BloodPressureSystolic),
            9 => Some(VitalSign::BloodPressureDiastolic),
            _ => None,
        }
    }

    /// Name of the form field that carries this vital on submission.
    pub fn field_name(self) -> &'static str {
        match self {
            VitalSign::RespiratoryRate => "respiratory_rate",
            VitalSign::HeartRate => "heart_rate",
            VitalSign::Temperature => "temperature",
            VitalSign::OxygenSaturation => "oxygen_saturation",
            VitalSign::HeightFeet => "height_feet",
            VitalSign::HeightInches => "height_inches",
            VitalSign::Weight => "weight",
            VitalSign::BloodPressureSystolic => "blood_pressure_systolic",
            VitalSign::BloodPressureDiastolic => "blood_pressure_diastolic",
        }
    }

    /// The submitted form value carrying this vital, if any.
    fn submitted_value(self, form: &TriageFormData) -> Option<f64> {
        match self {
            VitalSign::RespiratoryRate => form.respiratory_rate,
            VitalSign::HeartRate => form.heart_rate,
            VitalSign::Temperature => form.temperature,
            VitalSign::OxygenSaturation => form.oxygen_saturation,
            VitalSign::HeightFeet => form.height_feet,
            VitalSign::HeightInches => form.height_inches,
            VitalSign::Weight => form.weight,
            VitalSign::BloodPressureSystolic => form.blood_pressure_systolic,
            VitalSign::BloodPressureDiastolic => form.blood_pressure_diastolic,
        }
    }

    /// Catalog entry describing this vital type.
    pub fn catalog_entry(self) -> Vital {
        Vital {
            id: self.vital_id(),
            name: self.name().to_string(),
            unit: self.unit().to_string(),
        }
    }
}

/// One entry of the fixed vital-sign catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vital {
    pub id: i32,
    pub name: String,
    pub unit: String,
}

/// The full vital catalog in positional order.
pub fn vital_catalog() -> Vec<Vital> {
    VitalSign::ALL.iter().map(|v| v.catalog_entry()).collect()
}

/// Builds the full set of encounter-vital candidates for one submission.
///
/// Produces exactly one record per catalog entry, in catalog order. A field
/// the user left blank yields the missing-input sentinel. `taken_at` is
/// captured once by the caller, so every record of the submission shares
/// the same timestamp, user id, and encounter id. This is a pure mapping;
/// the caller drops non-positive values before persisting.
pub fn populate_encounter_vitals(
    form: &TriageFormData,
    user: &CurrentUser,
    encounter_id: i32,
    taken_at: DateTime<Utc>,
) -> Vec<EncounterVital> {
    VitalSign::ALL
        .iter()
        .map(|sign| EncounterVital {
            encounter_id,
            vital_id: sign.vital_id(),
            value: sign
                .submitted_value(form)
                .unwrap_or(MISSING_VITAL_SENTINEL),
            user_id: user.id,
            taken_at,
        })
        .collect()
}
