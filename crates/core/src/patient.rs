//! Patient entity and demographic helpers.
//!
//! This module provides the flat patient carrier used throughout intake,
//! the sex code with its wire helpers, and the derived-age calculation for
//! the prefilled form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Administrative sex recorded at intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
    Other,
}

impl Sex {
    /// Convert to the single-letter wire/form code.
    pub fn to_wire(self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
            Sex::Other => "O",
        }
    }

    /// Parse from a submitted form value.
    ///
    /// Accepts the single-letter codes as well as spelled-out values in any
    /// case; anything else is rejected.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "female" => Some(Sex::Female),
            "m" | "male" => Some(Sex::Male),
            "o" | "other" => Some(Sex::Other),
            _ => None,
        }
    }
}

impl serde::Serialize for Sex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_wire())
    }
}

impl<'de> serde::Deserialize<'de> for Sex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Sex::from_wire(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised sex code: {s}")))
    }
}

/// Flat patient record (demographics captured at triage).
///
/// `id` is 0 until the record has been persisted; the intake service
/// assigns the real identifier on creation. Patients are created once at
/// intake and only read thereafter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl Patient {
    /// Blank, unpersisted patient used to seed the empty intake form.
    pub fn blank() -> Self {
        Self {
            id: 0,
            first_name: String::new(),
            last_name: String::new(),
            birth_date: None,
            sex: None,
            address: None,
            city: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

/// Whole years between a birth date and `today`.
///
/// Returns `None` when the birth date lies in the future.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth_date)
}
