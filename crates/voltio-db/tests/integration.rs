//! Offline unit tests for voltio-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use voltio_core::{AppConfig, Environment, OrderStatus};
use voltio_db::{OrderRow, PoolConfig, ProductRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        currency: "COP".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        gateway: None,
        gateway_base_url: None,
        gateway_request_timeout_secs: 30,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`OrderRow`] has all expected
/// fields with the correct types, and that the stored status string parses
/// back into the typed enum. No database required.
#[test]
fn order_row_status_parses_stored_string() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = OrderRow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        status: "processing".to_string(),
        total: 423_000_i64,
        shipping_address: "Calle 123 #45-67, Sincelejo, Sucre".to_string(),
        payment_method: "credit_card".to_string(),
        payment_status: "pending".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.status().expect("parse status"), OrderStatus::Processing);
    assert_eq!(row.total, 423_000);
}

#[test]
fn order_row_rejects_unknown_stored_status() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = OrderRow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        status: "refunded".to_string(),
        total: 0,
        shipping_address: String::new(),
        payment_method: "cash".to_string(),
        payment_status: "pending".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert!(row.status().is_err());
}

/// Compile-time smoke test for [`ProductRow`]. No database required.
#[test]
fn product_row_has_expected_fields() {
    use chrono::Utc;

    let row = ProductRow {
        id: 42_i64,
        category_id: Some(7_i64),
        category_name: Some("Audio".to_string()),
        name: "Parlante Bluetooth JBL Go 4".to_string(),
        slug: "parlante-bluetooth-jbl-go-4".to_string(),
        description: None,
        price: 189_000_i64,
        image_url: Some("/images/jbl-go-4.jpg".to_string()),
        stock: 12_i32,
        is_featured: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 42);
    assert_eq!(row.price, 189_000);
    assert!(row.is_featured);
    assert_eq!(row.category_name.as_deref(), Some("Audio"));
}
