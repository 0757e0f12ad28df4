use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Merchant credentials for the payment gateway.
///
/// All three are issued together by the gateway; configuration treats them
/// as one unit. Either the full set is present or payments are disabled.
#[derive(Clone)]
pub struct GatewayCredentials {
    pub api_key: String,
    pub merchant_id: String,
    pub account_id: String,
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("api_key", &"[redacted]")
            .field("merchant_id", &self.merchant_id)
            .field("account_id", &self.account_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// ISO 4217 code used in totals and gateway requests.
    pub currency: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// `None` disables the payment endpoint; checkout still works.
    pub gateway: Option<GatewayCredentials>,
    /// Override for tests/sandbox; `None` selects by environment.
    pub gateway_base_url: Option<String>,
    pub gateway_request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("currency", &self.currency)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("gateway", &self.gateway)
            .field("gateway_base_url", &self.gateway_base_url)
            .field(
                "gateway_request_timeout_secs",
                &self.gateway_request_timeout_secs,
            )
            .finish()
    }
}
