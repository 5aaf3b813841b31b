use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_any() -> String {
    "Any".to_string()
}

fn default_all() -> String {
    "All".to_string()
}

/// Scholarship document as stored. Restriction fields fall back to their
/// permissive forms ("Any"/"All", no income ceiling, 0% floor) when a
/// document omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: String,
    pub name: String,
    #[serde(default = "default_any")]
    pub gender: String,
    #[serde(default)]
    pub education: String,
    #[serde(default = "default_any")]
    pub category: String,
    #[serde(default = "default_all")]
    pub state: String,
    #[serde(default)]
    pub max_income: Option<i64>,
    #[serde(default)]
    pub min_percentage: i64,
    #[serde(default = "default_any")]
    pub religion: String,
    #[serde(default = "default_any")]
    pub disability: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub apply_link: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateScholarshipRequest {
    pub name: String,
    pub gender: Option<String>,
    pub education: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
    pub max_income: Option<i64>,
    pub min_percentage: Option<i64>,
    pub religion: Option<String>,
    pub disability: Option<String>,
    pub deadline: String,
    pub amount: String,
    pub apply_link: String,
}

/// A scholarship annotated for a specific viewer and reference date.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedScholarship {
    #[serde(flatten)]
    pub scholarship: Scholarship,
    pub is_closing_soon: bool,
    pub days_left: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub category: Option<String>,
    pub education: Option<String>,
    pub search: Option<String>,
    pub max_income: Option<i64>,
    pub min_amount: Option<i64>,
    #[serde(default)]
    pub hide_tracked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_restriction_fields_fall_back_to_permissive_defaults() {
        let scholarship: Scholarship = serde_json::from_value(serde_json::json!({
            "id": "s-1",
            "name": "Merit Grant",
            "deadline": "2024-06-30",
        }))
        .unwrap();

        assert_eq!(scholarship.gender, "Any");
        assert_eq!(scholarship.category, "Any");
        assert_eq!(scholarship.state, "All");
        assert_eq!(scholarship.religion, "Any");
        assert_eq!(scholarship.disability, "Any");
        assert_eq!(scholarship.max_income, None);
        assert_eq!(scholarship.min_percentage, 0);
        assert_eq!(scholarship.education, "");
        assert_eq!(scholarship.created_at, None);
    }

    #[test]
    fn explicit_fields_survive_a_round_trip() {
        let scholarship: Scholarship = serde_json::from_value(serde_json::json!({
            "id": "s-2",
            "name": "State Merit",
            "gender": "F",
            "education": "UG",
            "state": "Karnataka",
            "max_income": 300000,
            "min_percentage": 60,
            "deadline": "2024-06-30",
            "amount": "₹1,80,000",
            "apply_link": "https://example.com/apply",
        }))
        .unwrap();

        assert_eq!(scholarship.gender, "F");
        assert_eq!(scholarship.max_income, Some(300000));
        assert_eq!(scholarship.min_percentage, 60);

        let raw = serde_json::to_value(&scholarship).unwrap();
        assert_eq!(raw["amount"], "₹1,80,000");
        assert_eq!(raw["state"], "Karnataka");
    }
}
