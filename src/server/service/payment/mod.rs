//! Stripe and PayPal checkout flows for pending orders.
//!
//! The provider clients in [`stripe`] and [`paypal`] only speak HTTP. This service
//! checks order ownership and status, builds the return URLs and records payment
//! state on the order.

pub mod paypal;
pub mod stripe;

use chrono::Utc;
use entity::order::OrderStatus;
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use secrecy::ExposeSecret;

use crate::server::{
    config::Config,
    data::{order::OrderRepository, repository::Repository},
    error::{auth::AuthError, payment::PaymentError, AppError},
    model::{order::Order, user::User},
    service::email::{self, EmailService},
};

use self::{paypal::PayPalClient, stripe::StripeClient};

pub struct PaymentService<'a> {
    db: &'a DatabaseConnection,
    http: &'a reqwest::Client,
    config: &'a Config,
    email: EmailService<'a>,
}

impl<'a> PaymentService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http: &'a reqwest::Client,
        config: &'a Config,
        email: EmailService<'a>,
    ) -> Self {
        Self {
            db,
            http,
            config,
            email,
        }
    }

    /// Starts a Stripe Checkout Session for the caller's pending order.
    ///
    /// # Returns
    /// - `Ok(String)` - Hosted checkout URL
    /// - `Err(AppError::NotFound)` - No such order
    /// - `Err(AppError::AuthErr)` - Order belongs to someone else
    /// - `Err(AppError::BadRequest)` - Order is no longer pending
    /// - `Err(AppError::PaymentErr)` - Stripe not configured or request failed
    pub async fn create_stripe_checkout(&self, order_id: i32, user: &User) -> Result<String, AppError> {
        let stripe_config = self
            .config
            .stripe
            .as_ref()
            .ok_or(PaymentError::NotConfigured("Stripe"))?;
        let order = self.payable_order(order_id, user).await?;

        let success_url = format!(
            "{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.config.frontend_url
        );
        let cancel_url = format!("{}/payment/cancel", self.config.frontend_url);

        let session = StripeClient::new(self.http, stripe_config)
            .create_checkout_session(&order, &success_url, &cancel_url)
            .await?;
        let url = session.url.clone().ok_or(PaymentError::Provider(
            "Stripe",
            "session has no checkout URL".to_string(),
        ))?;

        self.orders()
            .update(entity::order::ActiveModel {
                id: ActiveValue::Unchanged(order.id),
                stripe_session_id: ActiveValue::Set(Some(session.id.clone())),
                ..Default::default()
            })
            .await?;

        tracing::info!(
            "Created Stripe session {} for order {}",
            session.id,
            order.order_number
        );

        Ok(url)
    }

    /// Handles a Stripe webhook delivery.
    ///
    /// Only `checkout.session.completed` events change state; other verified events are
    /// acknowledged and ignored.
    ///
    /// # Returns
    /// - `Ok(())` - Event verified and handled
    /// - `Err(AppError::PaymentErr(InvalidSignature))` - Signature check failed
    /// - `Err(AppError::PaymentErr(NotConfigured))` - No webhook secret configured
    pub async fn handle_stripe_webhook(&self, payload: &[u8], signature: &str) -> Result<(), AppError> {
        let secret = self
            .config
            .stripe
            .as_ref()
            .and_then(|stripe| stripe.webhook_secret.as_ref())
            .ok_or(PaymentError::NotConfigured("Stripe webhook"))?;

        let event = stripe::verify_webhook(
            payload,
            signature,
            secret.expose_secret(),
            Utc::now().timestamp(),
        )?;

        let Some(session) = event.completed_session() else {
            tracing::debug!("Ignoring Stripe event {}", event.event_type);
            return Ok(());
        };

        if !self.mark_stripe_paid(&session.id, session.payment_intent).await? {
            tracing::warn!("Stripe session {} matches no pending order", session.id);
        }

        Ok(())
    }

    /// Checks a Checkout Session's payment status with Stripe.
    ///
    /// A paid session also marks its order paid, so returning from checkout settles the
    /// order even when the webhook has not arrived yet.
    pub async fn verify_stripe_payment(&self, session_id: &str) -> Result<bool, AppError> {
        let stripe_config = self
            .config
            .stripe
            .as_ref()
            .ok_or(PaymentError::NotConfigured("Stripe"))?;

        let session = StripeClient::new(self.http, stripe_config)
            .retrieve_session(session_id)
            .await?;

        if session.is_paid() {
            self.mark_stripe_paid(&session.id, session.payment_intent.clone())
                .await?;
        }

        Ok(session.is_paid())
    }

    /// Marks the pending order of a Stripe session as paid.
    ///
    /// # Returns
    /// - `Ok(true)` - Order moved from Pending to Paid
    /// - `Ok(false)` - No order for the session, or it was already settled
    pub async fn mark_stripe_paid(
        &self,
        session_id: &str,
        payment_intent_id: Option<String>,
    ) -> Result<bool, AppError> {
        let Some(order) = OrderRepository::new(self.db)
            .get_by_stripe_session_id(session_id)
            .await?
        else {
            return Ok(false);
        };
        if order.status != OrderStatus::Pending {
            return Ok(false);
        }

        let order_number = order.order_number.clone();
        let mut active = order.into_active_model();
        active.status = ActiveValue::Set(OrderStatus::Paid);
        active.paid_at = ActiveValue::Set(Some(Utc::now()));
        active.stripe_payment_intent_id = ActiveValue::Set(payment_intent_id);
        active.payment_method = ActiveValue::Set(Some("Stripe".to_string()));
        self.orders().update(active).await?;

        tracing::info!("Order {} paid through Stripe", order_number);

        Ok(true)
    }

    /// Creates a PayPal order for the caller's pending order.
    ///
    /// # Returns
    /// - `Ok(String)` - Buyer approval URL
    /// - `Err(AppError::NotFound)` - No such order
    /// - `Err(AppError::AuthErr)` - Order belongs to someone else
    /// - `Err(AppError::BadRequest)` - Order is no longer pending
    /// - `Err(AppError::PaymentErr)` - PayPal not configured or request failed
    pub async fn create_paypal_order(&self, order_id: i32, user: &User) -> Result<String, AppError> {
        let paypal_config = self
            .config
            .paypal
            .as_ref()
            .ok_or(PaymentError::NotConfigured("PayPal"))?;
        let order = self.payable_order(order_id, user).await?;

        let return_url = format!("{}/payment/paypal/success", self.config.frontend_url);
        let cancel_url = format!("{}/payment/paypal/cancel", self.config.frontend_url);

        let created = PayPalClient::new(self.http, paypal_config)
            .create_order(&order, &return_url, &cancel_url)
            .await?;

        self.orders()
            .update(entity::order::ActiveModel {
                id: ActiveValue::Unchanged(order.id),
                paypal_order_id: ActiveValue::Set(Some(created.id.clone())),
                ..Default::default()
            })
            .await?;

        tracing::info!(
            "Created PayPal order {} for order {}",
            created.id,
            order.order_number
        );

        Ok(created.approval_url)
    }

    /// Captures an approved PayPal order and moves the store order to Processing.
    ///
    /// # Returns
    /// - `Ok(String)` - Number of the paid order
    /// - `Err(AppError::NotFound)` - No such order
    /// - `Err(AppError::AuthErr)` - Order belongs to someone else
    /// - `Err(AppError::BadRequest)` - PayPal order id mismatch, order not pending, or
    ///   capture not completed
    pub async fn capture_paypal_order(
        &self,
        paypal_order_id: &str,
        order_id: i32,
        user: &User,
    ) -> Result<String, AppError> {
        let paypal_config = self
            .config
            .paypal
            .as_ref()
            .ok_or(PaymentError::NotConfigured("PayPal"))?;
        let order = self.payable_order(order_id, user).await?;
        if order.paypal_order_id.as_deref() != Some(paypal_order_id) {
            return Err(AppError::bad_request("PayPal order does not match this order"));
        }

        let completed = PayPalClient::new(self.http, paypal_config)
            .capture(paypal_order_id)
            .await?;
        if !completed {
            return Err(AppError::bad_request("Payment capture failed"));
        }

        self.orders()
            .update(entity::order::ActiveModel {
                id: ActiveValue::Unchanged(order.id),
                status: ActiveValue::Set(OrderStatus::Processing),
                paid_at: ActiveValue::Set(Some(Utc::now())),
                payment_method: ActiveValue::Set(Some("PayPal".to_string())),
                ..Default::default()
            })
            .await?;

        tracing::info!("Order {} paid through PayPal", order.order_number);

        email::log_failure(
            "order confirmation",
            &user.email,
            self.email
                .send_order_confirmation(&user.email, &order.order_number, order.total_amount)
                .await,
        );

        Ok(order.order_number)
    }

    /// Loads an order the caller may pay for: their own (or any, for admins) and
    /// still pending.
    async fn payable_order(&self, order_id: i32, user: &User) -> Result<Order, AppError> {
        let order = OrderRepository::new(self.db)
            .get_with_items(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        if order.user_id != user.id && !user.is_admin() {
            return Err(
                AuthError::AccessDenied(user.id, format!("payment for order {}", order_id)).into(),
            );
        }
        if order.status != OrderStatus::Pending {
            return Err(AppError::bad_request("Order already processed"));
        }

        Ok(order)
    }

    fn orders(&self) -> Repository<'a, entity::order::Entity, DatabaseConnection> {
        Repository::new(self.db)
    }
}
