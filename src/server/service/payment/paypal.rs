//! PayPal Orders v2 client.
//!
//! Every call first exchanges the client credentials for an OAuth2 access token.
//! Order totals are converted to USD with the configured exchange rate.

use rust_decimal::{Decimal, RoundingStrategy};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::server::{config::PayPalConfig, error::payment::PaymentError, model::order::Order};

const PROVIDER: &str = "PayPal";
const BRAND_NAME: &str = "Storefront";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    links: Vec<Link>,
}

/// A created PayPal order awaiting buyer approval.
#[derive(Debug, Clone)]
pub struct PayPalOrder {
    pub id: String,
    pub approval_url: String,
}

pub struct PayPalClient<'a> {
    http: &'a reqwest::Client,
    config: &'a PayPalConfig,
}

impl<'a> PayPalClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a PayPalConfig) -> Self {
        Self { http, config }
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.config.base_url))
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(provider_error)?;

        let token: TokenResponse = read_json(response).await?;

        Ok(token.access_token)
    }

    /// Creates a CAPTURE intent order for `order` and returns its approval link.
    pub async fn create_order(
        &self,
        order: &Order,
        return_url: &str,
        cancel_url: &str,
    ) -> Result<PayPalOrder, PaymentError> {
        let token = self.access_token().await?;
        let amount = convert_amount(order.total_amount, self.config.exchange_rate);

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "reference_id": order.id.to_string(),
                "description": format!("Order #{}", order.order_number),
                "amount": {
                    "currency_code": "USD",
                    "value": format!("{:.2}", amount),
                },
            }],
            "application_context": {
                "return_url": return_url,
                "cancel_url": cancel_url,
                "brand_name": BRAND_NAME,
                "user_action": "PAY_NOW",
            },
        });

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.config.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(provider_error)?;

        let created: OrderResponse = read_json(response).await?;
        let approval_url = created
            .links
            .into_iter()
            .find(|link| link.rel == "approve")
            .map(|link| link.href)
            .ok_or_else(|| PaymentError::Provider(PROVIDER, "no approve link in response".into()))?;

        Ok(PayPalOrder {
            id: created.id,
            approval_url,
        })
    }

    /// Captures an approved order.
    ///
    /// # Returns
    /// - `Ok(true)` - PayPal reports the capture COMPLETED
    /// - `Ok(false)` - PayPal rejected the capture or reported another status
    /// - `Err(PaymentError::Provider)` - Token request or transport failed
    pub async fn capture(&self, paypal_order_id: &str) -> Result<bool, PaymentError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{}/capture",
                self.config.base_url, paypal_order_id
            ))
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await
            .map_err(provider_error)?;

        if !response.status().is_success() {
            tracing::warn!(
                "PayPal capture of {} returned HTTP {}",
                paypal_order_id,
                response.status()
            );
            return Ok(false);
        }

        let captured: OrderResponse = response.json().await.map_err(provider_error)?;

        Ok(captured.status.as_deref() == Some("COMPLETED"))
    }
}

/// Converts an order total to USD, at least one cent, rounded to two places.
pub fn convert_amount(total: Decimal, exchange_rate: Decimal) -> Decimal {
    let minimum = Decimal::new(1, 2);
    if exchange_rate <= Decimal::ZERO {
        return total.max(minimum);
    }

    (total / exchange_rate)
        .max(minimum)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PaymentError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(PaymentError::Provider(
            PROVIDER,
            format!("HTTP {}: {}", status, body),
        ));
    }

    response.json().await.map_err(provider_error)
}

fn provider_error(err: reqwest::Error) -> PaymentError {
    PaymentError::Provider(PROVIDER, err.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockito::Matcher;
    use secrecy::SecretString;

    use super::*;

    fn config(base_url: String) -> PayPalConfig {
        PayPalConfig {
            client_id: "client".to_string(),
            client_secret: SecretString::from("secret"),
            base_url,
            exchange_rate: Decimal::from(25_000),
        }
    }

    fn order(total: Decimal) -> Order {
        Order {
            id: 9,
            order_number: "ORD-20260101-4321".to_string(),
            user_id: 1,
            status: entity::order::OrderStatus::Pending,
            total_amount: total,
            shipping_fee: Decimal::new(500, 2),
            tax_amount: Decimal::ZERO,
            recipient_name: "Jane".to_string(),
            shipping_phone: "555".to_string(),
            shipping_address: "1 Main St".to_string(),
            shipping_city: "Springfield".to_string(),
            payment_method: Some("PayPal".to_string()),
            notes: None,
            stripe_session_id: None,
            paypal_order_id: None,
            created_at: Utc::now(),
            paid_at: None,
            items: Vec::new(),
        }
    }

    async fn mock_token(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/v1/oauth2/token")
            .match_header("authorization", Matcher::Regex("^Basic ".into()))
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "client_credentials".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok","token_type":"Bearer"}"#)
            .create_async()
            .await
    }

    /// Expected: totals divide by the rate and never drop below one cent
    #[test]
    fn converts_amount_with_minimum() {
        let rate = Decimal::from(25_000);

        assert_eq!(convert_amount(Decimal::from(250_000), rate), Decimal::new(1000, 2));
        assert_eq!(convert_amount(Decimal::from(100), rate), Decimal::new(1, 2));
        assert_eq!(convert_amount(Decimal::from(37_500), rate), Decimal::new(150, 2));
    }

    /// Expected: order creation sends the converted amount and returns the approve link
    #[tokio::test]
    async fn creates_order_and_returns_approval_link() {
        let mut server = mockito::Server::new_async().await;
        let token = mock_token(&mut server).await;
        let create = server
            .mock("POST", "/v2/checkout/orders")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "intent": "CAPTURE",
                "purchase_units": [{ "amount": { "currency_code": "USD", "value": "10.00" } }]
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"PP-1","status":"CREATED","links":[
                    {"href":"https://paypal.test/self","rel":"self"},
                    {"href":"https://paypal.test/approve","rel":"approve"}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let config = config(server.url());
        let http = reqwest::Client::new();
        let created = PayPalClient::new(&http, &config)
            .create_order(&order(Decimal::from(250_000)), "http://shop/ok", "http://shop/no")
            .await
            .unwrap();

        token.assert_async().await;
        create.assert_async().await;
        assert_eq!(created.id, "PP-1");
        assert_eq!(created.approval_url, "https://paypal.test/approve");
    }

    /// Expected: capture reports true only for COMPLETED
    #[tokio::test]
    async fn capture_checks_completed_status() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _done = server
            .mock("POST", "/v2/checkout/orders/PP-1/capture")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"PP-1","status":"COMPLETED"}"#)
            .create_async()
            .await;
        let _pending = server
            .mock("POST", "/v2/checkout/orders/PP-2/capture")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"PP-2","status":"PAYER_ACTION_REQUIRED"}"#)
            .create_async()
            .await;
        let _rejected = server
            .mock("POST", "/v2/checkout/orders/PP-3/capture")
            .with_status(422)
            .with_body(r#"{"name":"UNPROCESSABLE_ENTITY"}"#)
            .create_async()
            .await;

        let config = config(server.url());
        let http = reqwest::Client::new();
        let client = PayPalClient::new(&http, &config);

        assert!(client.capture("PP-1").await.unwrap());
        assert!(!client.capture("PP-2").await.unwrap());
        assert!(!client.capture("PP-3").await.unwrap());
    }

    /// Expected: a failed token exchange is a provider error
    #[tokio::test]
    async fn token_failure_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _token = server
            .mock("POST", "/v1/oauth2/token")
            .with_status(401)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let config = config(server.url());
        let http = reqwest::Client::new();
        let result = PayPalClient::new(&http, &config).capture("PP-1").await;

        assert!(matches!(result, Err(PaymentError::Provider("PayPal", _))));
    }
}
