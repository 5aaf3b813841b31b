use crate::core::jwt_auth::{generate_jwt_token, JwtClaims};
use crate::core::AppError;
use crate::core::{AppConfig, AppErrorResponse, AppSuccessResponse};
use crate::db::store::MySqlDocStore;
use crate::db::users;
use crate::models::users::{LoginRequest, LoginResponse, RegisterRequest, UserView};
use actix_web::{get, post, web, HttpResponse, Result};
use chrono::{Duration, Utc};
use validator::Validate;

#[tracing::instrument(name = "Register User", skip(store, request))]
#[post("/register")]
pub async fn register(
    store: web::Data<MySqlDocStore>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    // Validate email format
    if request.validate().is_err() {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: "Please provide a valid email address".to_string(),
        }));
    }

    if request.password != request.confirm {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: "Passwords do not match".to_string(),
        }));
    }

    // Validate password strength
    if request.password.len() < 6 {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: "Password must be at least 6 characters long".to_string(),
        }));
    }

    let email = request.email.trim().to_lowercase();

    // Check if email already exists
    if users::email_exists(store.get_ref(), &email).await? {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: "A user with this email address already exists".to_string(),
        }));
    }

    // The document identity enforces uniqueness even when two registrations
    // race past the check above; the loser comes back as None
    let Some(account) = users::create_user(store.get_ref(), &email, &request.password, Utc::now())
        .await?
    else {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: "A user with this email address already exists".to_string(),
        }));
    };

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: UserView::from(account),
        message: "User registered successfully".to_string(),
    }))
}

#[tracing::instrument(name = "User Login", skip(store, config, request))]
#[post("/login")]
pub async fn login(
    store: web::Data<MySqlDocStore>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.trim().to_lowercase();

    let Some(account) = users::find_user(store.get_ref(), &email).await? else {
        return Ok(HttpResponse::Unauthorized().json(AppErrorResponse {
            success: false,
            message: "Email or password is incorrect".to_string(),
        }));
    };

    // Verify password
    if !users::verify_password(&request.password, &account.password_hash).await? {
        return Ok(HttpResponse::Unauthorized().json(AppErrorResponse {
            success: false,
            message: "Email or password is incorrect".to_string(),
        }));
    }

    // Generate JWT token
    let expires_at = Utc::now() + Duration::hours(config.jwt_auth_config.token_expiration_hours);
    let claims = JwtClaims {
        sub: account.email.clone(),
        role: account.role.clone(),
        exp: expires_at.timestamp() as usize,
    };

    let token = generate_jwt_token(&claims)?;

    let response = LoginResponse {
        user: UserView::from(account),
        token,
        expires_at,
    };

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: response,
        message: "Login successful".to_string(),
    }))
}

#[tracing::instrument(name = "Get Account", skip(store, claims))]
#[get("/account")]
pub async fn get_account(
    store: web::Data<MySqlDocStore>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let account = users::find_user(store.get_ref(), &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: UserView::from(account),
        message: "Account retrieved successfully".to_string(),
    }))
}
