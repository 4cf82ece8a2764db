//! Acting-user session types.
//!
//! Authentication itself is owned by the hosting application; triage only
//! needs to know who is acting so that encounters and vitals can be stamped
//! with the recording user.

use serde::Serialize;

/// The authenticated user acting in the current request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl CurrentUser {
    /// Full display name, "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
