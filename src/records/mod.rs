//! Record store adapters
//!
//! One adapter per backend collection, each exposing the same lifecycle:
//! submit, list (newest first, with client-side filtering), get-by-id,
//! partial update, delete, plus entity-specific conveniences. The
//! adapters shape raw backend documents into fully-defaulted records;
//! nothing above this layer touches a raw document.

pub mod adoptions;
pub mod animals;
pub mod donations;
pub mod faqs;
pub mod rescues;

pub use adoptions::{AdoptionRequest, AdoptionStore, AdoptionUpdate, NewAdoptionRequest};
pub use animals::{AnimalListing, AnimalStore, AnimalUpdate, NewAnimalListing};
pub use donations::{Donation, DonationStore, DonationUpdate, NewDonation};
pub use faqs::{FaqEntry, FaqStore, FaqUpdate, NewFaqQuestion};
pub use rescues::{NewRescueReport, RescueReport, RescueStore, RescueUpdate};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::store::Fields;

/// Lifecycle status of a staff-reviewed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Accepted => "accepted",
            Status::Rejected => "rejected",
        }
    }

    /// Parse a stored status string. Anything unrecognized (including an
    /// absent field) reads as pending.
    pub fn parse(s: &str) -> Status {
        match s {
            "accepted" => Status::Accepted,
            "rejected" => Status::Rejected,
            _ => Status::Pending,
        }
    }
}

/// Current instant in the ISO-8601 form used as the ordering key
/// (millisecond precision, trailing Z).
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize a value into a backend field map.
pub(crate) fn to_fields<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AppError::Unknown(format!(
            "Expected an object when serializing fields, got: {}",
            other
        ))),
    }
}
