use crate::core::jwt_auth::JwtClaims;
use crate::core::{AppError, AppSuccessResponse};
use crate::db::interactions;
use crate::db::store::MySqlDocStore;
use crate::models::interactions::{DashboardStats, InteractionKind};
use actix_web::{get, web, HttpResponse, Result};

#[tracing::instrument(name = "Get Dashboard Stats", skip(store, claims))]
#[get("/stats")]
pub async fn get_dashboard_stats(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let (saved, applied) = tokio::join!(
        interactions::list_ids(store.get_ref(), &claims.sub, InteractionKind::Saved),
        interactions::list_ids(store.get_ref(), &claims.sub, InteractionKind::Applied),
    );

    let stats = DashboardStats {
        saved_count: saved?.len(),
        applied_count: applied?.len(),
    };

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: stats,
        message: "Dashboard stats retrieved successfully".to_string(),
    }))
}
