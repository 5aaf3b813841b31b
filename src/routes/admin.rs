use crate::core::jwt_auth::JwtClaims;
use crate::core::{AppConfig, AppError, AppSuccessResponse, EmailService};
use crate::db::store::MySqlDocStore;
use crate::jobs::notification_sweep;
use actix_web::{post, web, HttpResponse, Result};

/// Manual trigger for the main sweep, outside the scheduler's cadence.
#[tracing::instrument(name = "Run Notification Sweep", skip(store, email_service, config, claims))]
#[post("/notifications/run")]
pub async fn run_notification_sweep_now(
    store: web::Data<MySqlDocStore>,
    email_service: web::Data<EmailService>,
    config: web::Data<AppConfig>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    if claims.role != "admin" {
        return Err(AppError::forbidden_error("Access denied"));
    }

    let today = config.notifications.today();
    let outcome = notification_sweep::run_notification_sweep(
        store.get_ref(),
        email_service.get_ref(),
        &config.notifications,
        today,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: outcome,
        message: "Notification sweep completed".to_string(),
    }))
}
