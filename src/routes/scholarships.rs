use std::collections::HashSet;

use crate::core::jwt_auth::JwtClaims;
use crate::core::{AppConfig, AppError, AppSuccessResponse};
use crate::db::store::MySqlDocStore;
use crate::db::{interactions, profiles, scholarships};
use crate::matching::aggregator::{find_matches, MatchFilters};
use crate::models::scholarships::{CreateScholarshipRequest, MatchQuery};
use actix_web::{get, post, web, HttpResponse, Result};
use chrono::Utc;
use unicode_segmentation::UnicodeSegmentation;

#[tracing::instrument(name = "Create Scholarship", skip(store, claims, request))]
#[post("")]
pub async fn create_scholarship(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
    request: web::Json<CreateScholarshipRequest>,
) -> Result<HttpResponse, AppError> {
    // Scholarships are admin-owned
    if claims.role != "admin" {
        return Err(AppError::forbidden_error("Access denied"));
    }

    let name = request.name.trim();
    if name.is_empty() || name.graphemes(true).count() > 200 {
        return Err(AppError::validation_error(
            "Scholarship name must be between 1 and 200 characters",
        ));
    }

    let scholarship = scholarships::create_scholarship(store.get_ref(), &request, Utc::now()).await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: scholarship,
        message: "Scholarship created successfully".to_string(),
    }))
}

#[tracing::instrument(name = "List Scholarships", skip(store))]
#[get("")]
pub async fn list_scholarships(
    store: web::Data<MySqlDocStore>,
) -> Result<HttpResponse, AppError> {
    let all = scholarships::list_scholarships(store.get_ref()).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: all,
        message: "Scholarships retrieved successfully".to_string(),
    }))
}

#[tracing::instrument(name = "Get Matching Scholarships", skip(store, config, claims, query))]
#[get("/matches")]
pub async fn get_matching_scholarships(
    store: web::Data<MySqlDocStore>,
    config: web::Data<AppConfig>,
    claims: JwtClaims,
    query: web::Query<MatchQuery>,
) -> Result<HttpResponse, AppError> {
    let (profile, all_scholarships) = tokio::join!(
        profiles::find_profile(store.get_ref(), &claims.sub),
        scholarships::list_scholarships(store.get_ref()),
    );

    let profile = profile?.ok_or_else(|| {
        AppError::not_found("No profile found for this account. Please submit the form first.")
    })?;
    let all_scholarships = all_scholarships?;

    let query = query.into_inner();
    let exclude_ids = if query.hide_tracked {
        interactions::tracked_ids(store.get_ref(), &claims.sub).await?
    } else {
        HashSet::new()
    };

    let today = config.notifications.today();
    let matches = find_matches(
        &profile,
        &all_scholarships,
        &MatchFilters::from(query),
        &exclude_ids,
        today,
        config.notifications.closing_window_days,
    );

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: matches,
        message: "Matching scholarships retrieved successfully".to_string(),
    }))
}
