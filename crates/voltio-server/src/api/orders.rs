//! Customer order endpoints: checkout, tracking, payment.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use voltio_core::{progress_percent, OrderDraft, OrderLineSnapshot, PaymentStatus};
use voltio_db::OrderWithItems;
use voltio_gateway::{PaymentMethodData, PaymentOutcome, PaymentRequest, TransactionState};

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const PAYMENT_METHODS: &[&str] = &["credit_card", "pse", "cash", "nequi"];

/// Upper bound on a submitted unit price, in whole pesos. Nothing in the
/// catalog comes near this; anything above it is a garbage or hostile value.
const MAX_UNIT_PRICE: i64 = 100_000_000;
const MAX_LINE_QUANTITY: u32 = 10_000;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// One cart line as submitted by the storefront at checkout.
#[derive(Debug, Deserialize)]
pub(in crate::api) struct CheckoutItem {
    pub product_id: i64,
    pub name: String,
    /// Unit price the shopper saw; snapshotted onto the order.
    pub price: i64,
    pub image_url: Option<String>,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub department: String,
    #[serde(default)]
    pub postal_code: String,
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CardData {
    pub number: String,
    pub expiration_date: String,
    pub security_code: String,
    pub holder_name: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct BankTransferData {
    pub bank_code: String,
    /// `"N"` natural person, `"J"` legal entity.
    pub payer_type: String,
    pub document_type: String,
    pub document_number: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct PayRequest {
    pub method: String,
    pub buyer_email: Option<String>,
    pub buyer_full_name: Option<String>,
    pub card: Option<CardData>,
    pub pse: Option<BankTransferData>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(in crate::api) struct CheckoutResponse {
    pub id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct OrderItemBody {
    pub product_id: i64,
    pub quantity: i32,
    pub price: i64,
    pub product_name: String,
    pub product_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct OrderBody {
    pub id: Uuid,
    pub status: String,
    /// Derived fulfillment progress percentage; never stored.
    pub progress: u8,
    pub total: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemBody>,
}

impl From<OrderWithItems> for OrderBody {
    fn from(value: OrderWithItems) -> Self {
        let OrderWithItems { order, items } = value;
        // Unknown stored statuses display as 0% rather than erroring.
        let progress = order.status().map(progress_percent).unwrap_or(0);
        Self {
            id: order.id,
            status: order.status,
            progress,
            total: order.total,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            shipping_address: order.shipping_address,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items: items
                .into_iter()
                .map(|i| OrderItemBody {
                    product_id: i.product_id,
                    quantity: i.quantity,
                    price: i.price,
                    product_name: i.product_name,
                    product_image: i.product_image,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_checkout(req_id: &str, body: &CheckoutRequest) -> Result<(), ApiError> {
    let required = [
        ("full_name", &body.full_name),
        ("email", &body.email),
        ("phone", &body.phone),
        ("address", &body.address),
        ("city", &body.city),
        ("department", &body.department),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("'{field}' is required"),
            ));
        }
    }

    if body.items.is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "cannot check out an empty cart",
        ));
    }
    for item in &body.items {
        if item.quantity < 1 {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("item {} has quantity 0", item.product_id),
            ));
        }
        if item.quantity > MAX_LINE_QUANTITY {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("item {} exceeds the maximum quantity", item.product_id),
            ));
        }
        if item.price < 0 {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("item {} has a negative price", item.product_id),
            ));
        }
        if item.price > MAX_UNIT_PRICE {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("item {} exceeds the maximum unit price", item.product_id),
            ));
        }
    }

    if !PAYMENT_METHODS.contains(&body.payment_method.as_str()) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("unknown payment method '{}'", body.payment_method),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/orders: create an order from the submitted cart.
///
/// Validation failures abort before anything is written. The order and its
/// item snapshots are persisted in one transaction; on failure nothing is
/// visible and the client keeps its cart for retry.
pub(in crate::api) async fn checkout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutResponse>>), ApiError> {
    let rid = &req_id.0;
    validate_checkout(rid, &body)?;

    let shipping_address = format!(
        "{}, {}, {} {}",
        body.address.trim(),
        body.city.trim(),
        body.department.trim(),
        body.postal_code.trim()
    )
    .trim_end()
    .to_string();

    let items: Vec<OrderLineSnapshot> = body
        .items
        .iter()
        .map(|i| OrderLineSnapshot {
            product_id: i.product_id,
            quantity: i.quantity,
            price: i.price,
            product_name: i.name.clone(),
            product_image: i.image_url.clone(),
        })
        .collect();

    // The draft recomputes the total from the snapshots; the client never
    // supplies it.
    let draft = OrderDraft::new(user.0, items, shipping_address, body.payment_method);

    let order = voltio_db::create_order(&state.pool, &draft)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(order_id = %order.id, user_id = %user.0, total = order.total, "order created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CheckoutResponse {
                id: order.id,
                status: order.status,
                payment_status: order.payment_status,
                total: order.total,
            },
            meta: ResponseMeta::new(rid.clone()),
        }),
    ))
}

/// GET /api/v1/orders: the current user's orders, newest first.
pub(in crate::api) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<OrderBody>>>, ApiError> {
    let orders = voltio_db::list_orders_for_user(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: orders.into_iter().map(OrderBody::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/orders/{order_id}: one of the current user's orders.
pub(in crate::api) async fn get_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderBody>>, ApiError> {
    let order = voltio_db::get_order_for_user(&state.pool, order_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: OrderBody::from(order),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/orders/{order_id}/pay: submit the order to the gateway.
///
/// The gateway verdict is recorded as the order's payment status. An order
/// already marked `completed` cannot be paid again. A transport failure is
/// reported as a generic `ERROR` outcome; there is no automatic retry.
pub(in crate::api) async fn pay_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<PayRequest>,
) -> Result<Json<ApiResponse<PaymentOutcome>>, ApiError> {
    let rid = &req_id.0;

    let Some(gateway) = state.gateway.clone() else {
        return Err(ApiError::new(
            rid,
            "unavailable",
            "payment processing is not configured",
        ));
    };

    let order = voltio_db::get_order_for_user(&state.pool, order_id, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    // A completed payment is final: re-submitting would charge the buyer a
    // second time and overwrite the recorded verdict.
    if order.order.payment_status == PaymentStatus::Completed.as_str() {
        return Err(ApiError::new(
            rid,
            "conflict",
            "order is already paid",
        ));
    }

    let method = payment_method_data(rid, &body)?;
    let buyer_email = require_field(rid, "buyer_email", body.buyer_email)?;
    let buyer_full_name = require_field(rid, "buyer_full_name", body.buyer_full_name)?;

    let request = PaymentRequest {
        order_id: order.order.id.to_string(),
        amount: order.order.total,
        currency: state.currency.clone(),
        description: format!("Pedido Voltio {}", order.order.id),
        buyer_email,
        buyer_full_name,
        method,
    };

    let outcome = match gateway.process_payment(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(order_id = %order.order.id, error = %e, "payment gateway failure");
            PaymentOutcome::connection_error(order.order.id.to_string())
        }
    };

    let payment_status = match outcome.state {
        TransactionState::Approved => PaymentStatus::Completed,
        TransactionState::Pending => PaymentStatus::Pending,
        TransactionState::Declined | TransactionState::Error => PaymentStatus::Failed,
    };
    voltio_db::set_payment_status(&state.pool, order.order.id, payment_status)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(rid.clone()),
    }))
}

fn payment_method_data(req_id: &str, body: &PayRequest) -> Result<PaymentMethodData, ApiError> {
    match body.method.as_str() {
        "credit_card" => body.card.as_ref().map_or_else(
            || {
                Err(ApiError::new(
                    req_id,
                    "validation_error",
                    "'card' fields are required for credit_card payments",
                ))
            },
            |card| {
                Ok(PaymentMethodData::CreditCard {
                    number: card.number.clone(),
                    expiration_date: card.expiration_date.clone(),
                    security_code: card.security_code.clone(),
                    holder_name: card.holder_name.clone(),
                })
            },
        ),
        "pse" => body.pse.as_ref().map_or_else(
            || {
                Err(ApiError::new(
                    req_id,
                    "validation_error",
                    "'pse' fields are required for pse payments",
                ))
            },
            |pse| {
                Ok(PaymentMethodData::BankTransfer {
                    bank_code: pse.bank_code.clone(),
                    payer_type: pse.payer_type.clone(),
                    document_type: pse.document_type.clone(),
                    document_number: pse.document_number.clone(),
                })
            },
        ),
        "cash" => Ok(PaymentMethodData::Cash),
        "nequi" => Ok(PaymentMethodData::DigitalWallet),
        other => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("unknown payment method '{other}'"),
        )),
    }
}

fn require_field(
    req_id: &str,
    field: &str,
    value: Option<String>,
) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("'{field}' is required"),
        )),
    }
}
