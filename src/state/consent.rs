//! The persisted consent record and its wire format.
//!
//! Stored as JSON under a single key:
//!
//! ```json
//! {"version":1,"consent":{"necessary":true,"analytics":true,"marketing":false}}
//! ```
//!
//! Records written by older builds carry only `{"consent":{"analytics":...}}`;
//! missing fields take their defaults. Anything that does not decode is
//! treated by callers as "no decision yet".

#[cfg(test)]
#[path = "consent_test.rs"]
mod consent_test;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

pub const CONSENT_RECORD_VERSION: u32 = 1;

/// Per-category consent flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentCategories {
    #[serde(default = "default_true")]
    pub necessary: bool,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub marketing: bool,
}

/// The user's persisted decision. Always overwritten whole, never merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    pub consent: ConsentCategories,
}

impl ConsentRecord {
    /// Full consent, written by the banner's Accept action.
    pub fn accepted() -> Self {
        Self {
            version: CONSENT_RECORD_VERSION,
            consent: ConsentCategories { necessary: true, analytics: true, marketing: true },
        }
    }

    /// Only strictly necessary storage; used for revocation and persisted
    /// declines.
    pub fn revoked() -> Self {
        Self {
            version: CONSENT_RECORD_VERSION,
            consent: ConsentCategories { necessary: true, analytics: false, marketing: false },
        }
    }

    /// Decode a raw stored value.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|e| StorageError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Malformed(e.to_string()))
    }
}

/// Whether the gated analytics scripts may run. Absent records deny.
pub fn analytics_allowed(record: Option<&ConsentRecord>) -> bool {
    record.is_some_and(|r| r.consent.analytics)
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CONSENT_RECORD_VERSION
}
