use crate::core::jwt_auth::JwtClaims;
use crate::core::{AppError, AppSuccessResponse};
use crate::db::profiles;
use crate::db::store::MySqlDocStore;
use crate::models::profiles::{Profile, SubmitProfileRequest};
use actix_web::{get, post, web, HttpResponse, Result};
use chrono::Utc;
use validator::Validate;

#[tracing::instrument(name = "Submit Profile", skip(store, claims, request))]
#[post("")]
pub async fn submit_profile(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
    request: web::Json<SubmitProfileRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate().map_err(AppError::validation_error)?;

    let request = request.into_inner();
    let profile = Profile {
        email: claims.sub.clone(),
        gender: request.gender,
        education: request.education,
        category: request.category,
        income: request.income,
        state: request.state,
        dob: request.dob,
        religion: request.religion,
        disability: request.disability,
        course: request.course,
        percentage: request.percentage,
        submitted_at: Utc::now(),
    };

    profiles::upsert_profile(store.get_ref(), &profile).await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: profile,
        message: "Profile submitted successfully".to_string(),
    }))
}

#[tracing::instrument(name = "Get My Profile", skip(store, claims))]
#[get("/me")]
pub async fn get_my_profile(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let profile = profiles::find_profile(store.get_ref(), &claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::not_found("No profile found for this account. Please submit the form first.")
        })?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: profile,
        message: "Profile retrieved successfully".to_string(),
    }))
}
