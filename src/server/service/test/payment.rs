use super::*;
use crate::server::{
    config::{Config, PayPalConfig, StripeConfig},
    data::repository::Repository,
    error::payment::PaymentError,
    service::{
        email::{test_mailer::RecordingMailer, EmailService},
        payment::{stripe, PaymentService},
    },
};
use entity::order::OrderStatus;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, EntityTrait};
use secrecy::SecretString;
use test_utils::factory::order::OrderFactory;

const WEBHOOK_SECRET: &str = "whsec_test";

fn config_with_providers(base_url: &str) -> Config {
    let mut config = Config::for_tests(std::env::temp_dir());
    config.stripe = Some(StripeConfig {
        secret_key: SecretString::from("sk_test"),
        webhook_secret: Some(SecretString::from(WEBHOOK_SECRET)),
        api_base: base_url.to_string(),
    });
    config.paypal = Some(PayPalConfig {
        client_id: "client".to_string(),
        client_secret: SecretString::from("secret"),
        base_url: base_url.to_string(),
        exchange_rate: Decimal::from(25_000),
    });
    config
}

async fn set_provider_ids(
    db: &DatabaseConnection,
    order_id: i32,
    stripe_session_id: Option<&str>,
    paypal_order_id: Option<&str>,
) -> Result<(), AppError> {
    Repository::<entity::order::Entity, DatabaseConnection>::new(db)
        .update(entity::order::ActiveModel {
            id: ActiveValue::Unchanged(order_id),
            stripe_session_id: ActiveValue::Set(stripe_session_id.map(str::to_string)),
            paypal_order_id: ActiveValue::Set(paypal_order_id.map(str::to_string)),
            ..Default::default()
        })
        .await?;

    Ok(())
}

async fn reload(db: &DatabaseConnection, order_id: i32) -> entity::order::Model {
    entity::prelude::Order::find_by_id(order_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

/// Tests starting a Stripe checkout for a pending order.
///
/// Expected: Ok(url) and the session id stored on the order
#[tokio::test]
async fn stripe_checkout_stores_session_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let (_category, product) = factory::helpers::create_product_with_category(db).await?;
    let order = OrderFactory::new(db, user.id).item(&product, 1).build().await?;
    let user = load_user(db, user.id).await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/checkout/sessions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"cs_42","url":"https://checkout.stripe.test/cs_42"}"#)
        .expect(1)
        .create_async()
        .await;
    let config = config_with_providers(&server.url());
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    let url = service.create_stripe_checkout(order.id, &user).await?;

    mock.assert_async().await;
    assert_eq!(url, "https://checkout.stripe.test/cs_42");
    assert_eq!(reload(db, order.id).await.stripe_session_id.as_deref(), Some("cs_42"));

    Ok(())
}

/// Tests checkout guards that run before any provider call.
///
/// Expected: AuthErr for a stranger, BadRequest for a paid order
#[tokio::test]
async fn checkout_requires_owned_pending_order() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::helpers::create_customer(db).await?;
    let stranger = factory::helpers::create_customer(db).await?;
    let pending = factory::create_order(db, owner.id).await?;
    let paid = OrderFactory::new(db, owner.id)
        .status(OrderStatus::Paid)
        .build()
        .await?;
    let owner = load_user(db, owner.id).await;
    let stranger = load_user(db, stranger.id).await;

    let config = config_with_providers("http://127.0.0.1:9");
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    assert!(matches!(
        service.create_stripe_checkout(pending.id, &stranger).await,
        Err(AppError::AuthErr(_))
    ));
    assert!(matches!(
        service.create_paypal_order(paid.id, &owner).await,
        Err(AppError::BadRequest(ref m)) if m == "Order already processed"
    ));

    Ok(())
}

/// Tests that payments fail cleanly when a provider is not configured.
///
/// Expected: Err(PaymentErr(NotConfigured))
#[tokio::test]
async fn unconfigured_provider_is_reported() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let order = factory::create_order(db, user.id).await?;
    let user = load_user(db, user.id).await;

    let config = Config::for_tests(std::env::temp_dir());
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    assert!(matches!(
        service.create_stripe_checkout(order.id, &user).await,
        Err(AppError::PaymentErr(PaymentError::NotConfigured(_)))
    ));
    assert!(matches!(
        service.handle_stripe_webhook(b"{}", "t=1,v1=00").await,
        Err(AppError::PaymentErr(PaymentError::NotConfigured(_)))
    ));

    Ok(())
}

/// Tests a signed `checkout.session.completed` webhook.
///
/// Expected: order marked Paid with payment intent and method recorded
#[tokio::test]
async fn webhook_marks_order_paid() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let order = factory::create_order(db, user.id).await?;
    set_provider_ids(db, order.id, Some("cs_77"), None).await?;

    let config = config_with_providers("http://127.0.0.1:9");
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    let payload = br#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_77","payment_status":"paid","payment_intent":"pi_77"}}}"#;
    let header = stripe::sign(payload, WEBHOOK_SECRET, chrono::Utc::now().timestamp());

    service.handle_stripe_webhook(payload, &header).await?;

    let stored = reload(db, order.id).await;
    assert_eq!(stored.status, OrderStatus::Paid);
    assert!(stored.paid_at.is_some());
    assert_eq!(stored.stripe_payment_intent_id.as_deref(), Some("pi_77"));
    assert_eq!(stored.payment_method.as_deref(), Some("Stripe"));

    Ok(())
}

/// Tests a webhook with a forged signature.
///
/// Expected: Err(PaymentErr(InvalidSignature)) and the order untouched
#[tokio::test]
async fn webhook_rejects_bad_signature() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let order = factory::create_order(db, user.id).await?;
    set_provider_ids(db, order.id, Some("cs_77"), None).await?;

    let config = config_with_providers("http://127.0.0.1:9");
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    let payload = br#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_77"}}}"#;
    let header = stripe::sign(payload, "whsec_forged", chrono::Utc::now().timestamp());

    let result = service.handle_stripe_webhook(payload, &header).await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::InvalidSignature(_)))
    ));
    assert_eq!(reload(db, order.id).await.status, OrderStatus::Pending);

    Ok(())
}

/// Tests capturing an approved PayPal order.
///
/// Expected: Ok(order number), order Processing, confirmation email sent
#[tokio::test]
async fn paypal_capture_moves_order_to_processing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let order = factory::create_order(db, user.id).await?;
    set_provider_ids(db, order.id, None, Some("PP-9")).await?;
    let user = load_user(db, user.id).await;

    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("POST", "/v1/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"tok"}"#)
        .create_async()
        .await;
    let _capture = server
        .mock("POST", "/v2/checkout/orders/PP-9/capture")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"PP-9","status":"COMPLETED"}"#)
        .create_async()
        .await;
    let config = config_with_providers(&server.url());
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    let order_number = service.capture_paypal_order("PP-9", order.id, &user).await?;

    assert_eq!(order_number, order.order_number);
    let stored = reload(db, order.id).await;
    assert_eq!(stored.status, OrderStatus::Processing);
    assert_eq!(stored.payment_method.as_deref(), Some("PayPal"));
    assert!(stored.paid_at.is_some());
    assert_eq!(mailer.sent().len(), 1);

    Ok(())
}

/// Tests a capture that PayPal reports as not completed.
///
/// Expected: Err(BadRequest("Payment capture failed")), order stays Pending, no email
#[tokio::test]
async fn paypal_capture_not_completed_is_rejected() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let order = factory::create_order(db, user.id).await?;
    set_provider_ids(db, order.id, None, Some("PP-9")).await?;
    let user = load_user(db, user.id).await;

    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("POST", "/v1/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"tok"}"#)
        .create_async()
        .await;
    let _capture = server
        .mock("POST", "/v2/checkout/orders/PP-9/capture")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"PP-9","status":"PENDING"}"#)
        .create_async()
        .await;
    let config = config_with_providers(&server.url());
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    let result = service.capture_paypal_order("PP-9", order.id, &user).await;

    assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m == "Payment capture failed"));
    let stored = reload(db, order.id).await;
    assert_eq!(stored.status, OrderStatus::Pending);
    assert!(stored.paid_at.is_none());
    assert!(mailer.sent().is_empty());

    Ok(())
}

/// Tests capturing with a PayPal order id that belongs to another order.
///
/// Expected: Err(BadRequest) without calling PayPal
#[tokio::test]
async fn paypal_capture_rejects_mismatched_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let order = factory::create_order(db, user.id).await?;
    set_provider_ids(db, order.id, None, Some("PP-9")).await?;
    let user = load_user(db, user.id).await;

    let config = config_with_providers("http://127.0.0.1:9");
    let http = reqwest::Client::new();
    let mailer = RecordingMailer::default();
    let service = PaymentService::new(db, &http, &config, EmailService::new(&mailer, "http://shop"));

    let result = service.capture_paypal_order("PP-OTHER", order.id, &user).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(reload(db, order.id).await.status, OrderStatus::Pending);

    Ok(())
}
