//! Client for the hosted payment-intent API.
//!
//! The storefront never confirms payments itself; it creates a payment
//! intent scoped to one product and hands the returned client secret to the
//! gateway's hosted checkout UI.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::types::ProductId;
use crate::models::config::PaymentConfig;

/// Request to create a payment intent for a single product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentIntent {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub currency: String,
    /// Carried as `metadata[productId]` so the webhook can reconcile later.
    pub product_id: ProductId,
}

/// A payment intent as returned by the gateway. Never persisted locally.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub client_secret: Option<String>,
}

/// Errors surfaced by the payment gateway client.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("payment gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },
}

/// Gateway operations needed by the purchase workflow.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// The fixed currency every intent is created in.
    fn currency(&self) -> &str;

    /// Create a payment intent and return it verbatim.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Stripe-backed [`PaymentClient`] speaking the form-encoded REST API.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    publishable_key: String,
    currency: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: config.secret_key.clone(),
            publishable_key: config.publishable_key.clone(),
            currency: config.currency.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Key embedded in the checkout page for the hosted payment UI.
    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    fn intent_params(request: &CreatePaymentIntent) -> Vec<(&'static str, String)> {
        vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
            ("metadata[productId]", request.product_id.to_string()),
        ]
    }
}

#[async_trait]
impl PaymentClient for StripeClient {
    fn currency(&self) -> &str {
        &self.currency
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&Self::intent_params(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GatewayErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<PaymentIntent>().await?)
    }
}

#[derive(Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Deserialize)]
struct GatewayErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_params_carry_amount_currency_and_metadata() {
        let request = CreatePaymentIntent {
            amount: 500,
            currency: "aud".to_string(),
            product_id: ProductId::new(42).unwrap(),
        };

        let params = StripeClient::intent_params(&request);
        assert_eq!(
            params,
            vec![
                ("amount", "500".to_string()),
                ("currency", "aud".to_string()),
                ("metadata[productId]", "42".to_string()),
            ]
        );
    }

    #[test]
    fn intent_response_parses_without_client_secret() {
        let intent: PaymentIntent = serde_json::from_str(
            r#"{"id":"pi_123","amount":500,"currency":"aud","client_secret":null}"#,
        )
        .unwrap();
        assert_eq!(intent.id, "pi_123");
        assert!(intent.client_secret.is_none());
    }
}
