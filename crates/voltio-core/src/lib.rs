//! Domain types and pure business logic for the Voltio storefront.
//!
//! Everything here is independent of the database and the HTTP layer: the
//! cart reducer, the order lifecycle state machine, the session object, and
//! application configuration.

pub mod app_config;
pub mod cart;
pub mod config;
pub mod order;
pub mod session;

pub use app_config::{AppConfig, Environment, GatewayCredentials};
pub use cart::{Cart, CartItem, CartProduct};
pub use config::{load_app_config, load_app_config_from_env};
pub use order::{
    progress_percent, OrderDraft, OrderError, OrderLineSnapshot, OrderStatus, PaymentStatus,
};
pub use session::{Session, SessionError, UserProfile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
