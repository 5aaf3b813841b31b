pub mod config;
mod responses;
pub mod jwt_auth;
mod telementry;
pub mod email_service;

pub use self::config::AppConfig;
pub use email_service::{EmailService, Mailer};
pub use responses::*;
pub use telementry::*;
