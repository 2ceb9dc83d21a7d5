use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::{
        auth::{
            AdminLoginRequest, AdminLoginResponse, AdminSummary, CustomerSummary, SendOtpRequest,
            SendOtpResponse, SessionClaims, VerifyOtpRequest, VerifyOtpResponse,
            ADMIN_SESSION_DAYS, CUSTOMER_SESSION_DAYS, OTP_VALIDITY_MINUTES,
        },
        order::is_valid_mobile,
    },
};
use brewline_db::{
    models::DbCustomer,
    repositories::{admin, customer},
    seed::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME},
};
use chrono::{DateTime, Duration, Utc};

use crate::{
    middleware::{
        auth::{generate_otp, hash_password, session_cookie, ADMIN_COOKIE, CUSTOMER_COOKIE},
        error_handling::AppError,
    },
    ApiState,
};

fn invalid_credentials() -> ShopError {
    ShopError::Authentication("Invalid credentials".to_string())
}

/// Whether a login attempt may create the first admin account.
pub fn is_default_admin_login(username: &str, password: &str) -> bool {
    username == DEFAULT_ADMIN_USERNAME && password == DEFAULT_ADMIN_PASSWORD
}

/// Checks a submitted code against the one stored for `customer`.
pub fn check_otp(customer: &DbCustomer, otp: &str, now: DateTime<Utc>) -> ShopResult<()> {
    let invalid = || ShopError::Validation("Invalid or expired OTP".to_string());

    let stored = customer.otp_code.as_deref().ok_or_else(invalid)?;
    let expiry = customer.otp_expiry.ok_or_else(invalid)?;
    if stored != otp.trim() || now > expiry {
        return Err(invalid());
    }
    Ok(())
}

fn validated_mobile(mobile: &str) -> ShopResult<&str> {
    let mobile = mobile.trim();
    if !is_valid_mobile(mobile) {
        return Err(ShopError::Validation(
            "Enter a valid 10-digit mobile number".to_string(),
        ));
    }
    Ok(mobile)
}

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(AppError(ShopError::Validation(
            "Username and password are required".to_string(),
        )));
    }

    let existing = admin::get_admin_by_username(&state.db_pool, username)
        .await
        .map_err(ShopError::Database)?;
    let account = match existing {
        Some(account) => account,
        None if is_default_admin_login(username, &payload.password) => {
            tracing::warn!("No admin account found; creating the default admin");
            let password_hash = hash_password(&payload.password).map_err(ShopError::Database)?;
            admin::create_admin(&state.db_pool, username, &password_hash)
                .await
                .map_err(ShopError::Database)?
        }
        None => return Err(AppError(invalid_credentials())),
    };

    if !admin::verify_password(&account, &payload.password).map_err(ShopError::Database)? {
        tracing::warn!("Failed admin login for {}", username);
        return Err(AppError(invalid_credentials()));
    }

    let token = state
        .sessions
        .sign(&SessionClaims::admin(account.id, &account.username, Utc::now()))?;
    let cookie = session_cookie(
        ADMIN_COOKIE,
        token.clone(),
        ADMIN_SESSION_DAYS,
        state.secure_cookies(),
    );
    tracing::info!("Admin {} logged in", account.username);

    Ok((
        CookieJar::new().add(cookie),
        Json(AdminLoginResponse {
            success: true,
            admin: AdminSummary {
                id: account.id,
                username: account.username,
            },
            token,
        }),
    ))
}

#[axum::debug_handler]
pub async fn send_otp(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, AppError> {
    let mobile = validated_mobile(&payload.mobile)?;

    let otp = generate_otp();
    let expiry = Utc::now() + Duration::minutes(OTP_VALIDITY_MINUTES);
    customer::store_otp(&state.db_pool, mobile, &otp, expiry)
        .await
        .map_err(ShopError::Database)?;

    // No SMS provider is wired up; the code is only available in the logs.
    tracing::info!("OTP for {}: {}", mobile, otp);

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
        demo_otp: state.app_env.is_development().then_some(otp),
    }))
}

#[axum::debug_handler]
pub async fn verify_otp(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mobile = validated_mobile(&payload.mobile)?;
    if payload.otp.trim().is_empty() {
        return Err(AppError(ShopError::Validation("OTP is required".to_string())));
    }

    let account = customer::get_customer_by_mobile(&state.db_pool, mobile)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| ShopError::NotFound("Customer not found".to_string()))?;
    check_otp(&account, &payload.otp, Utc::now())?;

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let account = customer::complete_login(&state.db_pool, account.id, name)
        .await
        .map_err(ShopError::Database)?;

    let token = state.sessions.sign(&SessionClaims::customer(
        account.id,
        &account.mobile,
        &account.name,
        Utc::now(),
    ))?;
    let cookie = session_cookie(
        CUSTOMER_COOKIE,
        token.clone(),
        CUSTOMER_SESSION_DAYS,
        state.secure_cookies(),
    );
    tracing::info!("Customer {} logged in", account.mobile);

    Ok((
        CookieJar::new().add(cookie),
        Json(VerifyOtpResponse {
            success: true,
            customer: CustomerSummary {
                id: account.id,
                name: account.name,
                mobile: account.mobile,
            },
            token,
        }),
    ))
}
