use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_role() -> String {
    "user".to_string()
}

/// Account document, stored under the lowercased email as document id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub email: String,
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserView {
    fn from(account: UserAccount) -> Self {
        UserView {
            email: account.email,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserView,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
