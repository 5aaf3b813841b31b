use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// U+001F cannot occur in an email address or a scholarship id, so the joined
// key needs no escaping and is never parsed back apart.
const KEY_SEP: char = '\u{1f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Saved,
    Applied,
}

impl InteractionKind {
    pub fn collection(&self) -> &'static str {
        match self {
            InteractionKind::Saved => "saved",
            InteractionKind::Applied => "applied",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{0}` is not a valid interaction. Use either `save` or `apply`")]
pub struct InvalidInteractionKind(String);

impl std::str::FromStr for InteractionKind {
    type Err = InvalidInteractionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save" | "saved" => Ok(InteractionKind::Saved),
            "apply" | "applied" => Ok(InteractionKind::Applied),
            other => Err(InvalidInteractionKind(other.to_string())),
        }
    }
}

/// Composite identity of one interaction record. The rendered document id is
/// derived from the fields; the fields themselves live in the record body.
#[derive(Debug, Clone, Copy)]
pub struct InteractionKey<'a> {
    pub email: &'a str,
    pub scholarship_id: &'a str,
    pub kind: InteractionKind,
}

impl InteractionKey<'_> {
    pub fn collection(&self) -> &'static str {
        self.kind.collection()
    }

    pub fn doc_id(&self) -> String {
        format!("{}{}{}", self.email, KEY_SEP, self.scholarship_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub email: String,
    pub scholarship_id: String,
    pub kind: InteractionKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct InteractionStatus {
    pub saved: bool,
    pub applied: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub saved_count: usize,
    pub applied_count: usize,
}
