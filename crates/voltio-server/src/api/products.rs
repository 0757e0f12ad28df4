//! Public catalog endpoints.
//!
//! Catalog reads degrade rather than error: a failing query is logged and
//! the client gets an empty list, so the storefront renders an empty state
//! instead of a failure page.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(in crate::api) struct ProductItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Whole currency units.
    pub price: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock: i32,
    pub is_featured: bool,
}

impl From<voltio_db::ProductRow> for ProductItem {
    fn from(row: voltio_db::ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            category: row.category_name,
            stock: row.stock,
            is_featured: row.is_featured,
        }
    }
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct CategoryItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ProductListParams {
    /// Filter by category slug.
    pub category: Option<String>,
    /// When true, only featured products (home page rail).
    pub featured: Option<bool>,
    pub limit: Option<i64>,
}

/// GET /api/v1/products: in-stock products, newest first.
pub(in crate::api) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ProductListParams>,
) -> Json<ApiResponse<Vec<ProductItem>>> {
    let result = if params.featured.unwrap_or(false) {
        voltio_db::list_featured_products(&state.pool, super::normalize_limit(params.limit)).await
    } else {
        voltio_db::list_products(&state.pool, params.category.as_deref()).await
    };

    let items = match result {
        Ok(rows) => rows.into_iter().map(ProductItem::from).collect(),
        Err(e) => {
            tracing::error!(error = %e, "product listing failed; returning empty catalog");
            Vec::new()
        }
    };

    Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// GET /api/v1/products/{product_id}: one product by id.
///
/// Unlike the listings, the detail page does not degrade: a missing product
/// is a real 404 and a broken database is a real error.
pub(in crate::api) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let row = voltio_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ProductItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/categories: all categories, alphabetical.
pub(in crate::api) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CategoryItem>>> {
    let items = match voltio_db::list_categories(&state.pool).await {
        Ok(rows) => rows
            .into_iter()
            .map(|row| CategoryItem {
                id: row.id,
                name: row.name,
                slug: row.slug,
                description: row.description,
            })
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "category listing failed; returning empty list");
            Vec::new()
        }
    };

    Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    })
}
