use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user's eligibility attributes, one document per account. Resubmission
/// overwrites the previous document; no history is kept.
///
/// String fields default to empty and numeric fields to zero so that an
/// incomplete document still evaluates (permissively where the scholarship
/// side is "Any"/"All", strictly otherwise) instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub income: i64,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub religion: String,
    #[serde(default)]
    pub disability: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub percentage: i64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitProfileRequest {
    pub gender: String,
    pub education: String,
    pub category: String,
    #[validate(range(min = 0))]
    pub income: i64,
    pub state: String,
    pub dob: String,
    pub religion: String,
    pub disability: String,
    pub course: String,
    #[validate(range(min = 0, max = 100))]
    pub percentage: i64,
}
