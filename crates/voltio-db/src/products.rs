//! Read operations for the `products` and `categories` tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `products` table, joined with its category name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Whole currency units.
    pub price: i64,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PRODUCT_SELECT: &str = "SELECT p.id, p.category_id, c.name AS category_name, p.name, \
                              p.slug, p.description, p.price, p.image_url, p.stock, \
                              p.is_featured, p.created_at, p.updated_at \
                              FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// Lists in-stock products, newest first, optionally filtered by category slug.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    category_slug: Option<&str>,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = match category_slug {
        Some(slug) => {
            sqlx::query_as::<_, ProductRow>(&format!(
                "{PRODUCT_SELECT} WHERE p.stock > 0 AND c.slug = $1 ORDER BY p.created_at DESC"
            ))
            .bind(slug)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProductRow>(&format!(
                "{PRODUCT_SELECT} WHERE p.stock > 0 ORDER BY p.created_at DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

/// Lists every product regardless of stock (admin catalog view).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_products(pool: &PgPool) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "{PRODUCT_SELECT} ORDER BY p.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lists featured, in-stock products for the home page.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_featured_products(pool: &PgPool, limit: i64) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "{PRODUCT_SELECT} WHERE p.stock > 0 AND p.is_featured \
         ORDER BY p.created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetches a single product by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no such product exists, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<ProductRow, DbError> {
    sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Lists all categories, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, slug, description, created_at FROM categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
