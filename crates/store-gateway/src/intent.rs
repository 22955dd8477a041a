//! # Payment Intents
//!
//! Client for the gateway's PaymentIntents API: server-side intent
//! creation and the single-attempt confirmation call.

use crate::config::GatewayConfig;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use store_core::{CheckoutError, CheckoutResult, Currency, Price};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// A payment intent issued by the gateway.
///
/// The `client_secret` is handed to the client side and consumed by
/// exactly one confirmation attempt.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Gateway intent ID (pi_...)
    pub id: String,

    /// Opaque secret binding the confirmation to this intent
    pub client_secret: String,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// Typed outcome of a confirmation attempt that reached the gateway.
///
/// Gateway-reported errors surface as `CheckoutError`; these are the
/// non-error outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Terminal success; the pipeline may advance
    Succeeded,
    /// Non-terminal status (requires_action, processing, ...).
    /// The orchestrator does not advance; the intent stays resumable.
    RequiresAction { status: String },
}

/// HTTP client for the payment gateway
pub struct GatewayClient {
    config: GatewayConfig,
    client: Client,
}

impl GatewayClient {
    /// Create a new gateway client
    pub fn new(config: GatewayConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        let config = GatewayConfig::from_env()?;
        Self::new(config)
    }

    /// Publishable key for the client side
    pub fn publishable_key(&self) -> &str {
        &self.config.publishable_key
    }

    /// Create a payment intent covering `total`.
    #[instrument(skip(self), fields(amount = total.amount))]
    pub async fn create_intent(&self, total: &Price) -> CheckoutResult<PaymentIntent> {
        if total.amount <= 0 {
            return Err(CheckoutError::InvalidRequest(
                "Intent amount must be positive".to_string(),
            ));
        }

        let form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), total.amount.to_string()),
            ("currency".to_string(), total.currency.as_str().to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        let idempotency_key = Uuid::new_v4().to_string();
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        debug!("Creating payment intent: {}", total.display());

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Gateway intent creation error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<GatewayErrorResponse>(&body) {
                return Err(CheckoutError::IntentCreation(error_response.error.message));
            }

            return Err(CheckoutError::IntentCreation(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let intent: GatewayIntentResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse intent response: {}", e))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            CheckoutError::Serialization("Intent response missing client_secret".to_string())
        })?;

        info!("Created payment intent: id={}", intent.id);

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
            amount: intent.amount,
            currency: parse_currency(&intent.currency),
            created_at: Utc::now(),
        })
    }

    /// Confirm an intent with a payment-instrument reference.
    ///
    /// The server never sees raw instrument data; `instrument_ref` is the
    /// gateway's opaque handle (pm_...).
    #[instrument(skip(self, client_secret, instrument_ref))]
    pub async fn confirm_intent(
        &self,
        client_secret: &str,
        instrument_ref: &str,
    ) -> CheckoutResult<ConfirmOutcome> {
        let intent_id = intent_id_from_secret(client_secret)?;

        let form_params: Vec<(String, String)> = vec![
            ("payment_method".to_string(), instrument_ref.to_string()),
            ("client_secret".to_string(), client_secret.to_string()),
        ];

        let url = format!(
            "{}/v1/payment_intents/{}/confirm",
            self.config.api_base_url, intent_id
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Gateway confirmation error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<GatewayErrorResponse>(&body) {
                let err = error_response.error;
                if err.code.as_deref() == Some("card_declined") {
                    return Err(CheckoutError::PaymentDeclined {
                        reason: err.message,
                    });
                }
                return Err(CheckoutError::Gateway {
                    provider: "stripe".to_string(),
                    message: err.message,
                });
            }

            return Err(CheckoutError::Gateway {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let confirmed: GatewayIntentResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse confirm response: {}", e))
        })?;

        info!(
            "Confirmed payment intent: id={}, status={}",
            confirmed.id, confirmed.status
        );

        if confirmed.status == "succeeded" {
            Ok(ConfirmOutcome::Succeeded)
        } else {
            Ok(ConfirmOutcome::RequiresAction {
                status: confirmed.status,
            })
        }
    }
}

/// Extract the intent ID from a client secret (`pi_..._secret_...`)
fn intent_id_from_secret(client_secret: &str) -> CheckoutResult<&str> {
    let id = client_secret.split("_secret").next().unwrap_or("");
    if id.is_empty() || !client_secret.contains("_secret") {
        return Err(CheckoutError::InvalidRequest(
            "Malformed client secret".to_string(),
        ));
    }
    Ok(id)
}

fn parse_currency(currency: &str) -> Currency {
    match currency.to_lowercase().as_str() {
        "eur" => Currency::EUR,
        "gbp" => Currency::GBP,
        _ => Currency::USD,
    }
}

// =============================================================================
// Gateway API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct GatewayIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    amount: i64,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    error: GatewayError,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GatewayClient {
        let config =
            GatewayConfig::new("sk_test_abc", "pk_test_xyz").with_api_base_url(base_url);
        GatewayClient::new(config).unwrap()
    }

    #[test]
    fn test_intent_id_from_secret() {
        assert_eq!(
            intent_id_from_secret("pi_123_secret_456").unwrap(),
            "pi_123"
        );
        assert!(intent_id_from_secret("garbage").is_err());
        assert!(intent_id_from_secret("_secret_x").is_err());
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        // Validation fails before any network call is made
        let client = test_client("http://localhost:1");
        let total = Price::from_cents(0, Currency::USD);
        let err = client.create_intent(&total).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_create_intent_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_abc",
                "client_secret": "pi_abc_secret_def",
                "amount": 2000,
                "currency": "usd",
                "status": "requires_payment_method"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let intent = client
            .create_intent(&Price::from_cents(2000, Currency::USD))
            .await
            .unwrap();

        assert_eq!(intent.id, "pi_abc");
        assert_eq!(intent.client_secret, "pi_abc_secret_def");
        assert_eq!(intent.amount, 2000);
        assert_eq!(intent.currency, Currency::USD);
    }

    #[tokio::test]
    async fn test_create_intent_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Amount too small", "code": "amount_too_small" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .create_intent(&Price::from_cents(1, Currency::USD))
            .await
            .unwrap_err();

        match err {
            CheckoutError::IntentCreation(msg) => assert_eq!(msg, "Amount too small"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_confirm_succeeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents/pi_abc/confirm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_abc",
                "amount": 2000,
                "currency": "usd",
                "status": "succeeded"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let outcome = client
            .confirm_intent("pi_abc_secret_def", "pm_card_visa")
            .await
            .unwrap();

        assert_eq!(outcome, ConfirmOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_confirm_requires_action_is_not_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents/pi_abc/confirm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_abc",
                "amount": 2000,
                "currency": "usd",
                "status": "requires_action"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let outcome = client
            .confirm_intent("pi_abc_secret_def", "pm_card_visa")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ConfirmOutcome::RequiresAction {
                status: "requires_action".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_confirm_card_declined() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents/pi_abc/confirm"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "error": { "message": "Your card was declined.", "code": "card_declined" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .confirm_intent("pi_abc_secret_def", "pm_card_visa")
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentDeclined { .. }));
        assert_eq!(err.status_code(), 402);
    }
}
