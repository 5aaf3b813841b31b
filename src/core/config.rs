use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use sqlx::mysql::MySqlConnectOptions;
use sqlx::ConnectOptions;

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub scholar_match_server_config: ScholarMatchServer,
    pub mysql: MySqlConfig,
    pub smtp: SmtpConfig,
    pub jwt_auth_config: JwtAuthConfig,
    pub notifications: NotificationsConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir().expect("Failed to find the current dir");
        let config_dir = base_path.join("src/core/configurations");

        let app_environment: Environment = std::env::var("SCHOLAR_MATCH_APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .expect("Failed to parse SCHOLAR_MATCH_APP_ENVIRONMENT");

        let configurations = config::Config::builder()
            .add_source(
                config::File::from(config_dir.join(app_environment.as_str())).required(true),
            )
            .build()?;

        configurations.try_deserialize()
    }
}

#[derive(Deserialize, Clone)]
pub struct ScholarMatchServer {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct MySqlConfig {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

impl MySqlConfig {
    pub fn connect(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .database(&self.database_name);

        options.log_statements(tracing::log::LevelFilter::Trace)
    }
}

#[derive(Deserialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Deserialize, Clone)]
pub struct JwtAuthConfig {
    pub token_expiration_hours: i64,
}

/// Deadline windows are configured per notification path. The results view,
/// the tiered reminders and the saved-only alerts each read their own value;
/// none of them share a constant.
#[derive(Deserialize, Clone)]
pub struct NotificationsConfig {
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,
    #[serde(default = "default_closing_window_days")]
    pub closing_window_days: i64,
    #[serde(default = "default_reminder_days")]
    pub reminder_days: Vec<i64>,
    #[serde(default = "default_saved_alert_window_days")]
    pub saved_alert_window_days: i64,
    #[serde(default = "default_lookback_hours")]
    pub new_scholarship_lookback_hours: i64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl NotificationsConfig {
    /// Calendar date used for all deadline math, in the configured timezone.
    pub fn today(&self) -> chrono::NaiveDate {
        let tz: chrono_tz::Tz = self.timezone.parse().unwrap_or(chrono_tz::Tz::UTC);
        chrono::Utc::now().with_timezone(&tz).date_naive()
    }
}

fn default_sweep_interval_hours() -> u64 {
    24
}

fn default_closing_window_days() -> i64 {
    7
}

fn default_reminder_days() -> Vec<i64> {
    vec![10, 5, 1]
}

fn default_saved_alert_window_days() -> i64 {
    3
}

fn default_lookback_hours() -> i64 {
    24
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

pub enum Environment {
    Local,
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not supported environment. Use either `local`, `sandbox` or `production` ",
                other
            )),
        }
    }
}
