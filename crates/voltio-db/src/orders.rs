//! Database operations for `orders` and `order_items`.
//!
//! Order creation writes the parent row and its line items in one
//! transaction: a failed item insert rolls the whole order back, so a
//! half-written order is never visible to readers.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use voltio_core::{OrderDraft, OrderError, OrderStatus, PaymentStatus};

use crate::DbError;

/// A row from the `orders` table.
///
/// `status` and `payment_status` are stored as the wire strings; parse with
/// [`OrderRow::status`] when the typed value is needed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    /// Whole currency units, excludes shipping.
    pub total: i64,
    pub shipping_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Parses the stored status string.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidStatus`] if the stored value is not a
    /// known status (possible only if the CHECK constraint was bypassed).
    pub fn status(&self) -> Result<OrderStatus, OrderError> {
        self.status.parse()
    }
}

/// A row from the `order_items` table: the product snapshot taken at
/// checkout.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: Uuid,
    pub product_id: i64,
    pub quantity: i32,
    pub price: i64,
    pub product_name: String,
    pub product_image: Option<String>,
}

/// An order together with its line items.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: OrderRow,
    pub items: Vec<OrderItemRow>,
}

const ORDER_SELECT: &str = "SELECT id, user_id, status, total, shipping_address, \
                            payment_method, payment_status, created_at, updated_at \
                            FROM orders";

const ITEM_SELECT: &str = "SELECT id, order_id, product_id, quantity, price, \
                           product_name, product_image \
                           FROM order_items";

/// Persists a new order from a checkout draft.
///
/// The `orders` row is inserted first so the `order_items` rows can
/// reference its generated id; both run inside a single transaction and the
/// parent row is rolled back if any item insert fails. The order starts as
/// `pending` with `payment_status = pending`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn create_order(pool: &PgPool, draft: &OrderDraft) -> Result<OrderRow, DbError> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, OrderRow>(
        "INSERT INTO orders (user_id, status, total, shipping_address, \
                             payment_method, payment_status) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, user_id, status, total, shipping_address, \
                   payment_method, payment_status, created_at, updated_at",
    )
    .bind(draft.user_id)
    .bind(OrderStatus::Pending.as_str())
    .bind(draft.total)
    .bind(&draft.shipping_address)
    .bind(&draft.payment_method)
    .bind(PaymentStatus::Pending.as_str())
    .fetch_one(&mut *tx)
    .await?;

    for item in &draft.items {
        sqlx::query(
            "INSERT INTO order_items \
                 (order_id, product_id, quantity, price, product_name, product_image) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(i32::try_from(item.quantity).unwrap_or(i32::MAX))
        .bind(item.price)
        .bind(&item.product_name)
        .bind(&item.product_image)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(order)
}

/// Lists a user's orders with their items, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn list_orders_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<OrderWithItems>, DbError> {
    let orders = sqlx::query_as::<_, OrderRow>(&format!(
        "{ORDER_SELECT} WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    attach_items(pool, orders).await
}

/// Fetches one order scoped to its owning user.
///
/// Scoping by `user_id` in the query means another user's order id behaves
/// exactly like a nonexistent one.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the order does not exist or belongs to a
/// different user, or [`DbError::Sqlx`] if a query fails.
pub async fn get_order_for_user(
    pool: &PgPool,
    order_id: Uuid,
    user_id: Uuid,
) -> Result<OrderWithItems, DbError> {
    let order = sqlx::query_as::<_, OrderRow>(&format!(
        "{ORDER_SELECT} WHERE id = $1 AND user_id = $2"
    ))
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    let items = sqlx::query_as::<_, OrderItemRow>(&format!(
        "{ITEM_SELECT} WHERE order_id = $1 ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(OrderWithItems { order, items })
}

/// Lists recent orders across all users (admin dashboard), newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn list_recent_orders(pool: &PgPool, limit: i64) -> Result<Vec<OrderWithItems>, DbError> {
    let orders = sqlx::query_as::<_, OrderRow>(&format!(
        "{ORDER_SELECT} ORDER BY created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    attach_items(pool, orders).await
}

/// Advances an order's fulfillment status, validating the transition first.
///
/// The current status is read `FOR UPDATE` inside a transaction so a
/// concurrent admin click cannot slip an illegal transition between read
/// and write. `updated_at` moves with the status.
///
/// # Errors
///
/// - [`DbError::NotFound`] if the order does not exist.
/// - [`DbError::Order`] with [`OrderError::IllegalTransition`] if the
///   lifecycle table forbids the move; nothing is written.
/// - [`DbError::Sqlx`] if a query fails.
pub async fn update_order_status(
    pool: &PgPool,
    order_id: Uuid,
    target: OrderStatus,
) -> Result<OrderRow, DbError> {
    let mut tx = pool.begin().await?;

    let current: String =
        sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

    let from: OrderStatus = current.parse::<OrderStatus>().map_err(DbError::Order)?;
    if !from.can_transition_to(target) {
        return Err(OrderError::IllegalTransition { from, to: target }.into());
    }

    let order = sqlx::query_as::<_, OrderRow>(
        "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 \
         RETURNING id, user_id, status, total, shipping_address, \
                   payment_method, payment_status, created_at, updated_at",
    )
    .bind(order_id)
    .bind(target.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order)
}

/// Records the payment gateway outcome on an order.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the order does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_payment_status(
    pool: &PgPool,
    order_id: Uuid,
    payment_status: PaymentStatus,
) -> Result<(), DbError> {
    let rows = sqlx::query(
        "UPDATE orders SET payment_status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(order_id)
    .bind(payment_status.as_str())
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Loads items for a batch of orders in one query and zips them back onto
/// their parents, preserving order.
async fn attach_items(
    pool: &PgPool,
    orders: Vec<OrderRow>,
) -> Result<Vec<OrderWithItems>, DbError> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let all_items = sqlx::query_as::<_, OrderItemRow>(&format!(
        "{ITEM_SELECT} WHERE order_id = ANY($1) ORDER BY id"
    ))
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = all_items
                .iter()
                .filter(|i| i.order_id == order.id)
                .cloned()
                .collect();
            OrderWithItems { order, items }
        })
        .collect())
}
