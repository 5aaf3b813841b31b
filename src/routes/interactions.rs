use crate::core::jwt_auth::JwtClaims;
use crate::core::{AppError, AppSuccessResponse};
use crate::db::store::MySqlDocStore;
use crate::db::{interactions, scholarships};
use crate::models::interactions::{InteractionKind, InteractionStatus};
use crate::models::scholarships::Scholarship;
use actix_web::{get, post, web, HttpResponse, Result};
use chrono::Utc;

#[tracing::instrument(name = "Track Scholarship", skip(store, claims))]
#[post("/{id}/{action}")]
pub async fn track_scholarship(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (scholarship_id, action) = path.into_inner();
    let kind: InteractionKind = action.parse().map_err(AppError::validation_error)?;

    if scholarships::get_scholarship(store.get_ref(), &scholarship_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("The requested scholarship was not found"));
    }

    let created =
        interactions::mark(store.get_ref(), &claims.sub, &scholarship_id, kind, Utc::now()).await?;

    let message = match (created, kind) {
        (true, InteractionKind::Saved) => "Scholarship saved successfully",
        (true, InteractionKind::Applied) => "Scholarship marked as applied",
        (false, InteractionKind::Saved) => "Scholarship was already saved",
        (false, InteractionKind::Applied) => "Scholarship was already marked as applied",
    };

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: serde_json::json!({
            "scholarship_id": scholarship_id,
            "kind": kind,
            "created": created,
        }),
        message: message.to_string(),
    }))
}

#[tracing::instrument(name = "Get Saved Scholarships", skip(store, claims))]
#[get("/saved")]
pub async fn get_saved_scholarships(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let saved = tracked_scholarships(store.get_ref(), &claims.sub, InteractionKind::Saved).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: saved,
        message: "Saved scholarships retrieved successfully".to_string(),
    }))
}

#[tracing::instrument(name = "Get Applied Scholarships", skip(store, claims))]
#[get("/applied")]
pub async fn get_applied_scholarships(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let applied =
        tracked_scholarships(store.get_ref(), &claims.sub, InteractionKind::Applied).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: applied,
        message: "Applied scholarships retrieved successfully".to_string(),
    }))
}

#[tracing::instrument(name = "Get Interaction Status", skip(store, claims))]
#[get("/{id}/status")]
pub async fn get_interaction_status(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let scholarship_id = path.into_inner();

    let (saved, applied) = tokio::join!(
        interactions::is_marked(
            store.get_ref(),
            &claims.sub,
            &scholarship_id,
            InteractionKind::Saved
        ),
        interactions::is_marked(
            store.get_ref(),
            &claims.sub,
            &scholarship_id,
            InteractionKind::Applied
        ),
    );

    let status = InteractionStatus {
        saved: saved?,
        applied: applied?,
    };

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: status,
        message: "Interaction status retrieved successfully".to_string(),
    }))
}

/// Full documents for the user's tracked ids: one id fetch plus one
/// collection scan instead of a lookup per scholarship.
async fn tracked_scholarships(
    store: &MySqlDocStore,
    email: &str,
    kind: InteractionKind,
) -> Result<Vec<Scholarship>, AppError> {
    let (ids, all) = tokio::join!(
        interactions::list_ids(store, email, kind),
        scholarships::list_scholarships(store),
    );

    let ids = ids?;
    Ok(all?.into_iter().filter(|s| ids.contains(&s.id)).collect())
}
