use crate::core::config::SmtpConfig;
use crate::core::AppError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use std::str::FromStr;

/// Outbound email as the notification sweeps consume it. A failed send is
/// reported to the caller, never retried here.
pub trait Mailer: Send + Sync {
    fn send_email(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

pub struct EmailService {
    smtp_config: SmtpConfig,
}

impl EmailService {
    pub fn new(smtp_config: SmtpConfig) -> Self {
        Self { smtp_config }
    }

    fn create_smtp_transport(&self) -> Result<SmtpTransport, AppError> {
        let credentials = Credentials::new(
            self.smtp_config.username.clone(),
            self.smtp_config.password.expose_secret().clone(),
        );

        // Port 465 is TLS from the first byte; submission ports (587, 2525)
        // speak STARTTLS
        let mailer = if self.smtp_config.port == 465 {
            SmtpTransport::relay(&self.smtp_config.host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP transport: {}", e))
                })?
                .port(self.smtp_config.port)
                .credentials(credentials)
                .build()
        } else {
            SmtpTransport::starttls_relay(&self.smtp_config.host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP transport: {}", e))
                })?
                .port(self.smtp_config.port)
                .credentials(credentials)
                .build()
        };

        Ok(mailer)
    }
}

impl Mailer for EmailService {
    fn send_email(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let from_mailbox = Mailbox::from_str(&format!(
            "{} <{}>",
            self.smtp_config.from_name, self.smtp_config.from_email
        ))
        .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to_email)
            .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = self.create_smtp_transport()?;

        match mailer.send(&email) {
            Ok(_) => {
                tracing::info!("Email `{}` sent successfully to: {}", subject, to_email);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to send email to {}: {}", to_email, e);
                Err(AppError::email_error(format!("Failed to send email: {}", e)))
            }
        }
    }
}
