//! Live integration tests for voltio-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/voltio-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use uuid::Uuid;

use voltio_core::{OrderDraft, OrderError, OrderLineSnapshot, OrderStatus, PaymentStatus};
use voltio_db::{
    create_order, get_order_for_user, get_product, list_orders_for_user, list_products,
    list_recent_orders, seed_catalog, set_payment_status, update_order_status, CatalogSeed,
    CategorySeed, DbError, ProductSeed,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn snapshot(product_id: i64, price: i64, quantity: u32) -> OrderLineSnapshot {
    OrderLineSnapshot {
        product_id,
        quantity,
        price,
        product_name: format!("Product {product_id}"),
        product_image: Some(format!("/images/{product_id}.jpg")),
    }
}

fn make_draft(user_id: Uuid) -> OrderDraft {
    OrderDraft::new(
        user_id,
        vec![snapshot(1, 89_000, 2), snapshot(5, 245_000, 1)],
        "Calle 123 #45-67, Sincelejo, Sucre 700001".to_string(),
        "credit_card".to_string(),
    )
}

fn demo_seed() -> CatalogSeed {
    CatalogSeed {
        categories: vec![CategorySeed {
            name: "Audio".to_string(),
            slug: "audio".to_string(),
            description: None,
            products: vec![
                ProductSeed {
                    name: "Parlante Bluetooth".to_string(),
                    slug: "parlante-bluetooth".to_string(),
                    description: Some("Parlante portátil".to_string()),
                    price: 189_000,
                    image_url: None,
                    stock: 10,
                    is_featured: true,
                },
                ProductSeed {
                    name: "Audífonos agotados".to_string(),
                    slug: "audifonos-agotados".to_string(),
                    description: None,
                    price: 99_000,
                    image_url: None,
                    stock: 0,
                    is_featured: false,
                },
            ],
        }],
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn create_order_writes_parent_and_item_snapshots(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let draft = make_draft(user_id);

    let order = create_order(&pool, &draft).await.expect("create order");

    assert_eq!(order.user_id, user_id);
    assert_eq!(order.status, "pending");
    assert_eq!(order.payment_status, "pending");
    assert_eq!(order.total, 423_000);

    let fetched = get_order_for_user(&pool, order.id, user_id)
        .await
        .expect("fetch order");
    assert_eq!(fetched.items.len(), 2);
    assert_eq!(fetched.items[0].product_id, 1);
    assert_eq!(fetched.items[0].quantity, 2);
    assert_eq!(fetched.items[0].price, 89_000);
    assert_eq!(fetched.items[0].product_name, "Product 1");
    assert_eq!(
        fetched.items[0].product_image.as_deref(),
        Some("/images/1.jpg")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_order_rolls_back_parent_when_item_insert_fails(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    // quantity 0 violates the order_items CHECK; after conversion from the
    // draft this can only happen via a bad snapshot, which must not leave a
    // dangling parent row behind.
    let draft = OrderDraft::new(
        user_id,
        vec![snapshot(1, 89_000, 1), snapshot(2, 10_000, 0)],
        "Calle 1".to_string(),
        "cash".to_string(),
    );

    let result = create_order(&pool, &draft).await;
    assert!(result.is_err(), "zero-quantity item must fail");

    let orders = list_orders_for_user(&pool, user_id)
        .await
        .expect("list orders");
    assert!(orders.is_empty(), "parent order row must be rolled back");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_order_is_scoped_to_owning_user(pool: sqlx::PgPool) {
    let owner = Uuid::new_v4();
    let order = create_order(&pool, &make_draft(owner))
        .await
        .expect("create order");

    let stranger = Uuid::new_v4();
    let err = get_order_for_user(&pool, order.id, stranger)
        .await
        .expect_err("stranger must not see the order");
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_orders_for_user_is_newest_first_with_items(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let first = create_order(&pool, &make_draft(user_id))
        .await
        .expect("create first");
    // Force distinct created_at ordering.
    sqlx::query("UPDATE orders SET created_at = created_at - INTERVAL '1 hour' WHERE id = $1")
        .bind(first.id)
        .execute(&pool)
        .await
        .expect("backdate first order");
    let second = create_order(&pool, &make_draft(user_id))
        .await
        .expect("create second");

    let orders = list_orders_for_user(&pool, user_id)
        .await
        .expect("list orders");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order.id, second.id, "newest first");
    assert_eq!(orders[1].order.id, first.id);
    assert_eq!(orders[0].items.len(), 2);
    assert_eq!(orders[1].items.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_recent_orders_spans_users_and_honors_limit(pool: sqlx::PgPool) {
    for _ in 0..3 {
        create_order(&pool, &make_draft(Uuid::new_v4()))
            .await
            .expect("create order");
    }

    let all = list_recent_orders(&pool, 50).await.expect("list all");
    assert_eq!(all.len(), 3);

    let limited = list_recent_orders(&pool, 2).await.expect("list limited");
    assert_eq!(limited.len(), 2);
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn status_advances_along_the_forward_chain(pool: sqlx::PgPool) {
    let order = create_order(&pool, &make_draft(Uuid::new_v4()))
        .await
        .expect("create order");

    for target in [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let updated = update_order_status(&pool, order.id, target)
            .await
            .unwrap_or_else(|e| panic!("transition to {target} failed: {e}"));
        assert_eq!(updated.status, target.as_str());
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn illegal_transition_is_rejected_without_mutation(pool: sqlx::PgPool) {
    let order = create_order(&pool, &make_draft(Uuid::new_v4()))
        .await
        .expect("create order");

    // pending -> shipped skips two steps.
    let err = update_order_status(&pool, order.id, OrderStatus::Shipped)
        .await
        .expect_err("skip must be rejected");
    assert!(matches!(
        err,
        DbError::Order(OrderError::IllegalTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped,
        })
    ));

    let current: String = sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
        .bind(order.id)
        .fetch_one(&pool)
        .await
        .expect("fetch status");
    assert_eq!(current, "pending", "status must be untouched");
}

#[sqlx::test(migrations = "../../migrations")]
async fn cancellation_works_from_non_terminal_but_not_after_delivery(pool: sqlx::PgPool) {
    let order = create_order(&pool, &make_draft(Uuid::new_v4()))
        .await
        .expect("create order");
    update_order_status(&pool, order.id, OrderStatus::Cancelled)
        .await
        .expect("pending order is cancellable");

    let delivered = create_order(&pool, &make_draft(Uuid::new_v4()))
        .await
        .expect("create order");
    for target in [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        update_order_status(&pool, delivered.id, target)
            .await
            .expect("advance");
    }
    let err = update_order_status(&pool, delivered.id, OrderStatus::Cancelled)
        .await
        .expect_err("delivered is terminal");
    assert!(matches!(
        err,
        DbError::Order(OrderError::IllegalTransition { .. })
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn updating_unknown_order_returns_not_found(pool: sqlx::PgPool) {
    let err = update_order_status(&pool, Uuid::new_v4(), OrderStatus::Confirmed)
        .await
        .expect_err("unknown order");
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn payment_status_is_recorded(pool: sqlx::PgPool) {
    let order = create_order(&pool, &make_draft(Uuid::new_v4()))
        .await
        .expect("create order");

    set_payment_status(&pool, order.id, PaymentStatus::Completed)
        .await
        .expect("set payment status");

    let stored: String = sqlx::query_scalar("SELECT payment_status FROM orders WHERE id = $1")
        .bind(order.id)
        .fetch_one(&pool)
        .await
        .expect("fetch payment status");
    assert_eq!(stored, "completed");
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn seed_is_idempotent_and_list_hides_out_of_stock(pool: sqlx::PgPool) {
    let seed = demo_seed();
    let first = seed_catalog(&pool, &seed).await.expect("first seed");
    let second = seed_catalog(&pool, &seed).await.expect("second seed");
    assert_eq!(first, 2);
    assert_eq!(second, 2, "upsert processes the same rows again");

    let products = list_products(&pool, None).await.expect("list products");
    assert_eq!(products.len(), 1, "out-of-stock product is hidden");
    assert_eq!(products[0].slug, "parlante-bluetooth");
    assert_eq!(products[0].category_name.as_deref(), Some("Audio"));

    let by_category = list_products(&pool, Some("audio"))
        .await
        .expect("list by category");
    assert_eq!(by_category.len(), 1);

    let none = list_products(&pool, Some("gaming"))
        .await
        .expect("list unknown category");
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_product_returns_not_found_for_unknown_id(pool: sqlx::PgPool) {
    let err = get_product(&pool, 9_999).await.expect_err("unknown id");
    assert!(matches!(err, DbError::NotFound));
}
