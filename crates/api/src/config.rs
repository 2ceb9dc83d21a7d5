//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the Brewline API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `JWT_SECRET`: Secret key for signing session tokens (required in production)
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `SHOP_TIMEZONE`: IANA timezone of the shop (default: "Asia/Kolkata")
//! - `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET`: Payment gateway credentials
//! - `RAZORPAY_API_URL`: Payment gateway base URL (default: "https://api.razorpay.com/v1")
//! - `APP_ENV`: "development" or "production" (default: "production")

use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};
use std::env;
use tracing::Level;

const DEV_SESSION_SECRET: &str = "brewline-development-secret";

/// Deployment environment, which controls a few development conveniences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => AppEnv::Development,
            _ => AppEnv::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        *self == AppEnv::Development
    }
}

/// Payment gateway credentials and endpoint.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub key_id: Option<String>,
    pub key_secret: Option<String>,
    pub api_url: String,
}

/// Configuration for the Brewline API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use brewline_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Secret used to sign admin and customer session tokens
    pub session_secret: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Timezone in which pickup slots and "today" are interpreted
    pub shop_timezone: Tz,

    pub gateway: GatewayConfig,

    pub app_env: AppEnv,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - SHOP_TIMEZONE is not a known timezone name
    /// - JWT_SECRET is missing outside development
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        let app_env = AppEnv::parse(&env::var("APP_ENV").unwrap_or_default());

        // Security settings
        let session_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if app_env.is_development() => DEV_SESSION_SECRET.to_string(),
            _ => return Err(eyre!("JWT_SECRET must be set outside development")),
        };

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let shop_timezone = env::var("SHOP_TIMEZONE")
            .unwrap_or_else(|_| "Asia/Kolkata".to_string())
            .parse::<Tz>()
            .map_err(|e| eyre!("Invalid SHOP_TIMEZONE: {}", e))?;

        // Payment gateway settings
        let gateway = GatewayConfig {
            key_id: env::var("RAZORPAY_KEY_ID").ok().filter(|v| !v.is_empty()),
            key_secret: env::var("RAZORPAY_KEY_SECRET").ok().filter(|v| !v.is_empty()),
            api_url: env::var("RAZORPAY_API_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string()),
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            session_secret,
            request_timeout,
            shop_timezone,
            gateway,
            app_env,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn log_level_falls_back_to_info() {
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("verbose"), Level::INFO);
    }

    #[test]
    fn app_env_parsing() {
        assert!(AppEnv::parse("development").is_development());
        assert!(AppEnv::parse(" Dev ").is_development());
        assert!(!AppEnv::parse("").is_development());
        assert!(!AppEnv::parse("production").is_development());
    }
}
