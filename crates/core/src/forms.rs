//! Parsed triage intake form payload.
//!
//! HTML forms post every field as text, and a blank input arrives as an
//! empty string rather than a missing key. The deserialiser used here folds
//! both cases to `None`, so the defaulting rules downstream (missing vital
//! becomes the sentinel, missing demographics stay unset) only ever see one
//! shape of "not provided".

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Treats a missing key, an empty value, and a whitespace-only value as
/// `None`; anything else must parse as `T`.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The submitted intake form, after explicit validated parsing.
///
/// Every field is optional at this stage; requiredness (patient names on a
/// new-patient submission) is enforced by the form mapper, and vital
/// defaulting is applied by the populator.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TriageFormData {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sex: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub chief_complaint: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub respiratory_rate: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub oxygen_saturation: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub height_feet: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub height_inches: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub blood_pressure_diastolic: Option<f64>,
}
