//! # Payment Gateway
//!
//! Orders are paid through Razorpay: the server opens a gateway order for the
//! order total, the browser completes checkout, and the resulting payment is
//! confirmed by checking the gateway's HMAC signature.

use async_trait::async_trait;
use brewline_core::errors::{ShopError, ShopResult};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;

use crate::config::GatewayConfig;

type HmacSha256 = Hmac<Sha256>;

pub const CURRENCY: &str = "INR";

/// A gateway-side order waiting for the customer to pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key the checkout widget is opened with.
    fn key_id(&self) -> ShopResult<String>;

    /// Opens a gateway order for `amount_paise`.
    async fn create_order(
        &self,
        amount_paise: i64,
        receipt: &str,
        notes: serde_json::Value,
    ) -> ShopResult<GatewayOrder>;

    /// Whether `signature` was issued by the gateway for this payment.
    fn verify_signature(&self, gateway_order_id: &str, payment_id: &str, signature: &str) -> ShopResult<bool>;
}

fn not_configured() -> ShopError {
    ShopError::Payment("Payment gateway is not configured".to_string())
}

/// Checks a checkout signature: hex HMAC-SHA256 of `"{order_id}|{payment_id}"`
/// keyed with the gateway secret. The comparison runs in constant time.
pub fn verify_payment_signature(
    key_secret: &str,
    gateway_order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{}|{}", gateway_order_id, payment_id).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Razorpay REST client.
pub struct RazorpayGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl RazorpayGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn credentials(&self) -> ShopResult<(&str, &str)> {
        match (&self.config.key_id, &self.config.key_secret) {
            (Some(id), Some(secret)) => Ok((id.as_str(), secret.as_str())),
            _ => Err(not_configured()),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> ShopResult<String> {
        self.credentials().map(|(id, _)| id.to_string())
    }

    async fn create_order(
        &self,
        amount_paise: i64,
        receipt: &str,
        notes: serde_json::Value,
    ) -> ShopResult<GatewayOrder> {
        let (key_id, key_secret) = self.credentials()?;
        let url = format!("{}/orders", self.config.api_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .basic_auth(key_id, Some(key_secret))
            .json(&json!({
                "amount": amount_paise,
                "currency": CURRENCY,
                "receipt": receipt,
                "notes": notes,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Payment gateway unreachable: {}", e);
                ShopError::Payment("Failed to create payment order".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Payment gateway returned {}: {}", status, body);
            return Err(ShopError::Payment("Failed to create payment order".to_string()));
        }

        let order = response.json::<GatewayOrder>().await.map_err(|e| {
            tracing::error!("Unexpected payment gateway response: {}", e);
            ShopError::Payment("Failed to create payment order".to_string())
        })?;

        tracing::info!("Gateway order {} created for receipt {}", order.id, receipt);
        Ok(order)
    }

    fn verify_signature(&self, gateway_order_id: &str, payment_id: &str, signature: &str) -> ShopResult<bool> {
        let (_, key_secret) = self.credentials()?;
        Ok(verify_payment_signature(key_secret, gateway_order_id, payment_id, signature))
    }
}
