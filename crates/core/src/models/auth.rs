use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long an admin session stays valid.
pub const ADMIN_SESSION_DAYS: i64 = 7;
/// How long a customer session stays valid.
pub const CUSTOMER_SESSION_DAYS: i64 = 30;
/// How long a one-time password may be used after it is issued.
pub const OTP_VALIDITY_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionKind {
    Admin { username: String },
    Customer { mobile: String, name: String },
}

/// Claims carried inside a signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    #[serde(flatten)]
    pub kind: SessionKind,
    /// Expiry as a unix timestamp in seconds.
    pub exp: i64,
}

impl SessionClaims {
    pub fn admin(id: Uuid, username: &str, now: DateTime<Utc>) -> Self {
        Self {
            sub: id,
            kind: SessionKind::Admin {
                username: username.to_string(),
            },
            exp: (now + Duration::days(ADMIN_SESSION_DAYS)).timestamp(),
        }
    }

    pub fn customer(id: Uuid, mobile: &str, name: &str, now: DateTime<Utc>) -> Self {
        Self {
            sub: id,
            kind: SessionKind::Customer {
                mobile: mobile.to_string(),
                name: name.to_string(),
            },
            exp: (now + Duration::days(CUSTOMER_SESSION_DAYS)).timestamp(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.kind, SessionKind::Admin { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSummary {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub admin: AdminSummary,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpRequest {
    pub mobile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_otp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub mobile: String,
    pub otp: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub customer: CustomerSummary,
    pub token: String,
}
