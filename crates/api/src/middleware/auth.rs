//! # Authentication Module
//!
//! Password hashing for staff accounts, signed session tokens for admins and
//! customers, one-time passwords, and the [`AdminSession`] extractor that
//! guards the admin and counter endpoints.
//!
//! Session tokens are HS256 JWTs signed with `JWT_SECRET`. They are accepted
//! from an `Authorization: Bearer` header or from the session cookie.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::auth::SessionClaims,
};
use eyre::Result;
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::{middleware::error_handling::AppError, ApiState};

pub const ADMIN_COOKIE: &str = "admin_token";
pub const CUSTOMER_COOKIE: &str = "customer_token";

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call and the result is returned
/// in PHC string format, ready to be stored.
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Six-digit one-time password.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, claims: &SessionClaims) -> ShopResult<String> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| ShopError::Internal(Box::new(e)))
    }

    /// Returns the claims of a well-signed, unexpired token.
    pub fn verify(&self, token: &str) -> ShopResult<SessionClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    ShopError::Authentication("Session expired".to_string())
                }
                _ => ShopError::Authentication("Invalid session token".to_string()),
            })
    }
}

/// Builds the session cookie for a freshly issued token.
pub fn session_cookie(
    name: &'static str,
    token: String,
    max_age_days: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::days(max_age_days))
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

/// Token presented with a request: bearer header first, then the cookie.
pub fn request_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| {
        CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|cookie| cookie.value().to_string())
    })
}

/// An authenticated staff member. Extracting it rejects the request with 401
/// unless a valid admin session token is presented.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionClaims);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = request_token(&parts.headers, ADMIN_COOKIE)
            .ok_or_else(|| ShopError::Authentication("Unauthorized".to_string()))?;
        let claims = state.sessions.verify(&token)?;

        if !claims.is_admin() {
            return Err(AppError(ShopError::Authentication("Unauthorized".to_string())));
        }
        Ok(AdminSession(claims))
    }
}
