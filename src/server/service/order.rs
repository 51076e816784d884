//! Order placement and lifecycle.
//!
//! Placing and cancelling orders touch several tables (orders, order lines, product
//! stock, cart lines) and run inside a [`UnitOfWork`] so a failure at any step leaves
//! the database untouched.

use chrono::Utc;
use entity::order::OrderStatus;
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};

use crate::server::{
    data::{
        cart::CartRepository, order::OrderRepository, repository::Repository,
        unit_of_work::UnitOfWork,
    },
    error::{auth::AuthError, AppError},
    model::{
        order::{CreateOrderParams, Order},
        user::User,
    },
    service::email::{self, EmailService},
};

/// Flat shipping fee charged on every order.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);
/// Orders are not taxed.
pub const TAX_AMOUNT: Decimal = Decimal::ZERO;

pub struct OrderService<'a> {
    db: &'a DatabaseConnection,
    email: EmailService<'a>,
}

impl<'a> OrderService<'a> {
    pub fn new(db: &'a DatabaseConnection, email: EmailService<'a>) -> Self {
        Self { db, email }
    }

    /// Places an order from the contents of the user's cart.
    ///
    /// Line prices are snapshotted from the products, stock is decremented and the cart
    /// emptied in one transaction. A confirmation email is attempted after commit.
    ///
    /// # Returns
    /// - `Ok(Order)` - The pending order with its lines
    /// - `Err(AppError::BadRequest)` - Missing shipping details, empty cart or
    ///   insufficient stock for a line
    /// - `Err(AppError::DbErr)` - Database error, transaction rolled back
    pub async fn create(&self, user: &User, params: CreateOrderParams) -> Result<Order, AppError> {
        validate_shipping(&params)?;

        let cart = CartRepository::new(self.db)
            .get_cart_with_items(user.id)
            .await?
            .filter(|cart| !cart.items.is_empty())
            .ok_or_else(|| AppError::bad_request("Cart is empty"))?;

        if let Some(line) = cart
            .items
            .iter()
            .find(|line| line.stock_quantity < line.quantity)
        {
            return Err(insufficient_stock(&line.product_name));
        }

        let order_number = self.generate_order_number().await?;

        let uow = UnitOfWork::begin(self.db).await?;
        let order = uow
            .orders()
            .add(entity::order::ActiveModel {
                order_number: ActiveValue::Set(order_number),
                user_id: ActiveValue::Set(user.id),
                status: ActiveValue::Set(OrderStatus::Pending),
                total_amount: ActiveValue::Set(Decimal::ZERO),
                shipping_fee: ActiveValue::Set(SHIPPING_FEE),
                tax_amount: ActiveValue::Set(TAX_AMOUNT),
                recipient_name: ActiveValue::Set(params.recipient_name),
                shipping_phone: ActiveValue::Set(params.shipping_phone),
                shipping_address: ActiveValue::Set(params.shipping_address),
                shipping_city: ActiveValue::Set(params.shipping_city),
                payment_method: ActiveValue::Set(Some(params.payment_method)),
                notes: ActiveValue::Set(params.notes),
                paid_at: ActiveValue::Set(None),
                stripe_session_id: ActiveValue::Set(None),
                stripe_payment_intent_id: ActiveValue::Set(None),
                paypal_order_id: ActiveValue::Set(None),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;

        let mut subtotal = Decimal::ZERO;
        for line in &cart.items {
            let product = uow
                .products()
                .get_by_id(line.product_id)
                .await?
                .filter(|p| p.stock_quantity >= line.quantity)
                .ok_or_else(|| insufficient_stock(&line.product_name))?;

            let total_price = product.price * Decimal::from(line.quantity);
            uow.order_items()
                .add(entity::order_item::ActiveModel {
                    order_id: ActiveValue::Set(order.id),
                    product_id: ActiveValue::Set(product.id),
                    quantity: ActiveValue::Set(line.quantity),
                    unit_price: ActiveValue::Set(product.price),
                    total_price: ActiveValue::Set(total_price),
                    updated_at: ActiveValue::Set(None),
                    ..Default::default()
                })
                .await?;
            subtotal += total_price;

            let remaining = product.stock_quantity - line.quantity;
            let mut active = product.into_active_model();
            active.stock_quantity = ActiveValue::Set(remaining);
            uow.products().update(active).await?;
        }

        let total_amount = subtotal + SHIPPING_FEE + TAX_AMOUNT;
        let mut active = order.into_active_model();
        active.total_amount = ActiveValue::Set(total_amount);
        let order = uow.orders().update(active).await?;

        for line in &cart.items {
            uow.cart_items().soft_delete(line.id).await?;
        }
        uow.commit().await?;

        tracing::info!(
            "Created order {} for user {} with {} items, total {}",
            order.order_number,
            user.id,
            cart.items.len(),
            total_amount
        );

        email::log_failure(
            "order confirmation",
            &user.email,
            self.email
                .send_order_confirmation(&user.email, &order.order_number, total_amount)
                .await,
        );

        self.load(order.id).await
    }

    /// Lists the user's own orders, newest first.
    pub async fn get_for_user(&self, user_id: i32) -> Result<Vec<Order>, AppError> {
        Ok(OrderRepository::new(self.db).get_by_user_id(user_id).await?)
    }

    /// Gets an order visible to `requester`: their own, or any order for admins.
    ///
    /// # Returns
    /// - `Ok(Order)` - Order with lines
    /// - `Err(AppError::NotFound)` - No such order
    /// - `Err(AppError::AuthErr(AccessDenied))` - Order belongs to someone else
    pub async fn get_by_id(&self, id: i32, requester: &User) -> Result<Order, AppError> {
        let order = self.load(id).await?;
        ensure_visible(&order, requester)?;

        Ok(order)
    }

    pub async fn get_all(&self) -> Result<Vec<Order>, AppError> {
        Ok(OrderRepository::new(self.db).get_all_with_items().await?)
    }

    pub async fn get_by_status(&self, status: &str) -> Result<Vec<Order>, AppError> {
        let status = parse_status(status)?;

        Ok(OrderRepository::new(self.db).get_by_status(status).await?)
    }

    /// Sets an order's status. Moving to `Paid` stamps the payment time if unset.
    ///
    /// # Returns
    /// - `Ok(Order)` - Updated order
    /// - `Err(AppError::BadRequest)` - Unknown status name
    /// - `Err(AppError::NotFound)` - No such order
    pub async fn update_status(&self, id: i32, status: &str) -> Result<Order, AppError> {
        let status = parse_status(status)?;
        let orders = Repository::<entity::order::Entity, DatabaseConnection>::new(self.db);
        let order = orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        let stamp_paid = status == OrderStatus::Paid && order.paid_at.is_none();
        let mut active = order.into_active_model();
        active.status = ActiveValue::Set(status);
        if stamp_paid {
            active.paid_at = ActiveValue::Set(Some(Utc::now()));
        }
        orders.update(active).await?;

        tracing::info!("Order {} status set to {}", id, status);

        self.load(id).await
    }

    /// Cancels a pending or processing order and returns its units to stock.
    ///
    /// # Returns
    /// - `Ok(Order)` - Cancelled order
    /// - `Err(AppError::NotFound)` - No such order
    /// - `Err(AppError::AuthErr(AccessDenied))` - Order belongs to someone else
    /// - `Err(AppError::BadRequest)` - Order already paid, shipped, delivered or cancelled
    pub async fn cancel(&self, id: i32, requester: &User) -> Result<Order, AppError> {
        let uow = UnitOfWork::begin(self.db).await?;
        let order = OrderRepository::new(uow.connection())
            .get_with_items(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        ensure_visible(&order, requester)?;
        if !order.status.is_cancellable() {
            return Err(AppError::bad_request(
                "Order cannot be cancelled in its current status",
            ));
        }

        for line in &order.items {
            let Some(product) = uow.products().get_by_id(line.product_id).await? else {
                continue;
            };
            let restored = product.stock_quantity + line.quantity;
            let mut active = product.into_active_model();
            active.stock_quantity = ActiveValue::Set(restored);
            uow.products().update(active).await?;
        }

        uow.orders()
            .update(entity::order::ActiveModel {
                id: ActiveValue::Unchanged(order.id),
                status: ActiveValue::Set(OrderStatus::Cancelled),
                ..Default::default()
            })
            .await?;
        uow.commit().await?;

        tracing::info!("Order {} cancelled by user {}", order.order_number, requester.id);

        self.load(id).await
    }

    async fn load(&self, id: i32) -> Result<Order, AppError> {
        OrderRepository::new(self.db)
            .get_with_items(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))
    }

    /// Generates an unused `ORD-YYYYMMDD-NNNN` number.
    async fn generate_order_number(&self) -> Result<String, AppError> {
        let repo = OrderRepository::new(self.db);
        loop {
            let candidate = format!(
                "ORD-{}-{}",
                Utc::now().format("%Y%m%d"),
                rand::rng().random_range(1000..=9999)
            );
            if !repo.order_number_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }
}

/// Admins see every order; other users only their own.
pub fn ensure_visible(order: &Order, requester: &User) -> Result<(), AppError> {
    if requester.is_admin() || order.user_id == requester.id {
        return Ok(());
    }

    Err(AuthError::AccessDenied(requester.id, format!("access to order {}", order.id)).into())
}

fn parse_status(status: &str) -> Result<OrderStatus, AppError> {
    status
        .parse()
        .map_err(|_| AppError::bad_request("Invalid status"))
}

fn insufficient_stock(product_name: &str) -> AppError {
    AppError::bad_request(format!("Insufficient stock for {}", product_name))
}

fn validate_shipping(params: &CreateOrderParams) -> Result<(), AppError> {
    let required = [
        (&params.recipient_name, "Recipient name"),
        (&params.shipping_phone, "Shipping phone"),
        (&params.shipping_address, "Shipping address"),
        (&params.shipping_city, "Shipping city"),
    ];

    if let Some((_, label)) = required.iter().find(|(value, _)| value.is_empty()) {
        return Err(AppError::bad_request(format!("{} is required", label)));
    }

    Ok(())
}
