//! Admin dashboard endpoints, behind bearer auth.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use voltio_core::{progress_percent, OrderStatus};

use crate::middleware::RequestId;

use super::orders::OrderBody;
use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct StatusUpdate {
    pub status: String,
}

/// GET /api/v1/admin/orders: recent orders across all users.
pub(in crate::api) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<OrderBody>>>, ApiError> {
    let limit = normalize_limit(params.limit);
    let orders = voltio_db::list_recent_orders(&state.pool, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: orders.into_iter().map(OrderBody::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/admin/orders/{order_id}/status: advance the lifecycle.
///
/// The target must name a known status, and the move must be legal from the
/// stored status; an out-of-order jump is a conflict and leaves the row
/// untouched.
pub(in crate::api) async fn update_order_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;

    let target: OrderStatus = body.status.parse().map_err(|_| {
        ApiError::new(
            rid,
            "validation_error",
            format!("unknown order status '{}'", body.status),
        )
    })?;

    let order = voltio_db::update_order_status(&state.pool, order_id, target)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");

    Ok(Json(ApiResponse {
        data: serde_json::json!({
            "id": order.id,
            "status": order.status,
            "progress": progress_percent(target),
            "updated_at": order.updated_at,
        }),
        meta: ResponseMeta::new(rid.clone()),
    }))
}
