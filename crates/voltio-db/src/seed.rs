//! Catalog seeding for local development and demos.

use sqlx::PgPool;

use crate::DbError;

/// A category plus its products, as provided by the CLI seed data.
#[derive(Debug, Clone)]
pub struct CatalogSeed {
    pub categories: Vec<CategorySeed>,
}

#[derive(Debug, Clone)]
pub struct CategorySeed {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Clone)]
pub struct ProductSeed {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Whole currency units.
    pub price: i64,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_featured: bool,
}

/// Upserts the seed catalog, keyed by slug.
///
/// Returns the number of products processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, seed: &CatalogSeed) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for category in &seed.categories {
        let category_id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, slug, description) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 description = EXCLUDED.description \
             RETURNING id",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .fetch_one(&mut *tx)
        .await?;

        for product in &category.products {
            sqlx::query(
                "INSERT INTO products \
                     (category_id, name, slug, description, price, image_url, stock, is_featured) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (slug) DO UPDATE SET \
                     category_id = EXCLUDED.category_id, \
                     name        = EXCLUDED.name, \
                     description = EXCLUDED.description, \
                     price       = EXCLUDED.price, \
                     image_url   = EXCLUDED.image_url, \
                     stock       = EXCLUDED.stock, \
                     is_featured = EXCLUDED.is_featured, \
                     updated_at  = NOW()",
            )
            .bind(category_id)
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image_url)
            .bind(product.stock)
            .bind(product.is_featured)
            .execute(&mut *tx)
            .await?;
            count += 1;
        }
    }

    tx.commit().await?;
    Ok(count)
}
