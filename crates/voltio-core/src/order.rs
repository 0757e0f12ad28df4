//! Order lifecycle: status state machine, progress mapping, and the
//! snapshot types written at checkout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::CartItem;

/// Fulfillment status of a persisted order.
///
/// Checkout creates orders as `Pending`; every later change is an explicit
/// admin action validated against [`OrderStatus::can_transition_to`]. There
/// are no time-based transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders never move again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Explicit transition table.
    ///
    /// The normal flow is the forward chain pending -> confirmed ->
    /// processing -> shipped -> delivered, one step at a time. Cancellation
    /// is reachable from any non-terminal state. Everything else is illegal,
    /// including no-op self transitions and any move out of a terminal state.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Pending, Self::Confirmed)
            | (Self::Confirmed, Self::Processing)
            | (Self::Processing, Self::Shipped)
            | (Self::Shipped, Self::Delivered) => true,
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(OrderError::InvalidStatus(other.to_string())),
        }
    }
}

/// Payment state recorded on the order from the gateway outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(OrderError::InvalidPaymentStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid order status: {0}")]
    InvalidStatus(String),
    #[error("invalid payment status: {0}")]
    InvalidPaymentStatus(String),
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
}

/// Customer-facing fulfillment progress for a status, as a percentage.
///
/// Purely presentational derived state; pending, cancelled, and anything
/// else map to 0.
#[must_use]
pub fn progress_percent(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Confirmed => 25,
        OrderStatus::Processing => 50,
        OrderStatus::Shipped => 75,
        OrderStatus::Delivered => 100,
        OrderStatus::Pending | OrderStatus::Cancelled => 0,
    }
}

/// One order line as captured at checkout time.
///
/// All fields are copies of the cart item, which itself copied them from the
/// catalog when the product was added. Later catalog edits (price changes,
/// renames) must not alter historical orders, so this is never a live
/// reference to a product row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineSnapshot {
    pub product_id: i64,
    pub quantity: u32,
    /// Unit price at order time, whole currency units.
    pub price: i64,
    pub product_name: String,
    pub product_image: Option<String>,
}

impl From<&CartItem> for OrderLineSnapshot {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
            product_name: item.name.clone(),
            product_image: item.image_url.clone(),
        }
    }
}

/// Everything needed to persist a new order, built from a cart at checkout.
///
/// `total` excludes shipping and is computed from the snapshots, never taken
/// from the client.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: Uuid,
    pub items: Vec<OrderLineSnapshot>,
    pub total: i64,
    pub shipping_address: String,
    pub payment_method: String,
}

impl OrderDraft {
    /// Builds a draft from order lines, recomputing the total.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        items: Vec<OrderLineSnapshot>,
        shipping_address: String,
        payment_method: String,
    ) -> Self {
        // Saturating sum: wire values are validated upstream, but the total
        // must never wrap negative regardless.
        let total = items.iter().fold(0i64, |acc, i| {
            acc.saturating_add(i.price.saturating_mul(i64::from(i.quantity)))
        });
        Self {
            user_id,
            items,
            total,
            shipping_address,
            payment_method,
        }
    }
}
