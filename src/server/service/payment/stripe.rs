//! Stripe Checkout client and webhook signature verification.
//!
//! Talks to the Checkout Sessions API with form-encoded requests authenticated by the
//! secret key. Webhook payloads are checked against the `Stripe-Signature` header
//! (HMAC-SHA256 over `{timestamp}.{payload}`).

use hmac::{Hmac, Mac};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::Sha256;

use crate::server::{config::StripeConfig, error::payment::PaymentError, model::order::Order};

const PROVIDER: &str = "Stripe";
const CURRENCY: &str = "usd";

/// Maximum age in seconds of a webhook signature timestamp.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Event type delivered when a customer completes a Checkout Session.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// The completed session carried by a `checkout.session.completed` event.
    pub fn completed_session(&self) -> Option<CheckoutSession> {
        if self.event_type != CHECKOUT_SESSION_COMPLETED {
            return None;
        }

        serde_json::from_value(self.data.object.clone()).ok()
    }
}

pub struct StripeClient<'a> {
    http: &'a reqwest::Client,
    config: &'a StripeConfig,
}

impl<'a> StripeClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a StripeConfig) -> Self {
        Self { http, config }
    }

    /// Creates a card Checkout Session for `order`.
    ///
    /// One line item per order line plus a shipping line when the fee is positive.
    /// The order id and number travel in the session metadata.
    pub async fn create_checkout_session(
        &self,
        order: &Order,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let form = checkout_form(order, success_url, cancel_url)?;

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.config.api_base))
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(provider_error)?;

        read_session(response).await
    }

    pub async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .http
            .get(format!(
                "{}/v1/checkout/sessions/{}",
                self.config.api_base, session_id
            ))
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await
            .map_err(provider_error)?;

        read_session(response).await
    }
}

async fn read_session(response: reqwest::Response) -> Result<CheckoutSession, PaymentError> {
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

/// Converts a currency amount to the integer minor unit Stripe expects.
pub fn to_cents(amount: Decimal) -> Result<i64, PaymentError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| PaymentError::Provider(PROVIDER, format!("amount {} out of range", amount)))
}

/// Builds the bracketed form fields of a Checkout Session request.
fn checkout_form(
    order: &Order,
    success_url: &str,
    cancel_url: &str,
) -> Result<Vec<(String, String)>, PaymentError> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[0]".into(), "card".into()),
        ("success_url".into(), success_url.into()),
        ("cancel_url".into(), cancel_url.into()),
        ("client_reference_id".into(), order.id.to_string()),
        ("metadata[order_id]".into(), order.id.to_string()),
        ("metadata[order_number]".into(), order.order_number.clone()),
    ];

    let mut push_line = |index: usize,
                         name: &str,
                         image: Option<&str>,
                         unit_amount: i64,
                         quantity: i32| {
        let prefix = format!("line_items[{}]", index);
        form.push((format!("{prefix}[price_data][currency]"), CURRENCY.into()));
        form.push((format!("{prefix}[price_data][product_data][name]"), name.into()));
        if let Some(image) = image {
            form.push((
                format!("{prefix}[price_data][product_data][images][0]"),
                image.into(),
            ));
        }
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            unit_amount.to_string(),
        ));
        form.push((format!("{prefix}[quantity]"), quantity.to_string()));
    };

    for (index, line) in order.items.iter().enumerate() {
        push_line(
            index,
            &line.product_name,
            line.product_image_url.as_deref(),
            to_cents(line.unit_price)?,
            line.quantity,
        );
    }

    if order.shipping_fee > Decimal::ZERO {
        push_line(
            order.items.len(),
            "Shipping Fee",
            None,
            to_cents(order.shipping_fee)?,
            1,
        );
    }

    Ok(form)
}

/// Verifies a `Stripe-Signature` header and parses the event payload.
///
/// The header carries `t=<unix seconds>` and one or more `v1=<hex hmac>` entries.
/// Any matching `v1` entry is accepted if the timestamp is within tolerance of `now`.
///
/// # Returns
/// - `Ok(WebhookEvent)` - Signature valid and payload parsed
/// - `Err(PaymentError::InvalidSignature)` - Header malformed, stale or no signature
///   matches, or the payload is not an event
pub fn verify_webhook(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<WebhookEvent, PaymentError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp_str =
        timestamp.ok_or_else(|| PaymentError::InvalidSignature("missing timestamp".into()))?;
    let timestamp: i64 = timestamp_str
        .parse()
        .map_err(|_| PaymentError::InvalidSignature("invalid timestamp".into()))?;
    if signatures.is_empty() {
        return Err(PaymentError::InvalidSignature("missing v1 signature".into()));
    }
    if now.abs_diff(timestamp) > SIGNATURE_TOLERANCE_SECS.unsigned_abs() {
        return Err(PaymentError::InvalidSignature("timestamp outside tolerance".into()));
    }

    let matches = signatures.iter().any(|signature| {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(timestamp_str.as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.verify_slice(&expected).is_ok()
    });
    if !matches {
        return Err(PaymentError::InvalidSignature("signature mismatch".into()));
    }

    serde_json::from_slice(payload)
        .map_err(|e| PaymentError::InvalidSignature(format!("unparseable payload: {}", e)))
}

/// Produces a `Stripe-Signature` header value for `payload`.
#[cfg(test)]
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
