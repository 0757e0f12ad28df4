mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use voltio_gateway::{GatewayClient, MerchantAccount};

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = voltio_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = voltio_db::PoolConfig::from_app_config(&config);
    let pool = voltio_db::connect_pool(&config.database_url, pool_config).await?;
    voltio_db::run_migrations(&pool).await?;

    let gateway = build_gateway(&config)?;
    if gateway.is_none() {
        tracing::warn!("payment gateway credentials not set; payment endpoint disabled");
    }

    let auth = AuthState::from_env(matches!(config.env, voltio_core::Environment::Development))?;
    let app = build_app(
        AppState {
            pool,
            gateway,
            currency: config.currency.clone(),
        },
        auth,
        default_rate_limit_state(),
    );

    tracing::info!(addr = %config.bind_addr, env = ?config.env, "starting storefront API");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Builds the gateway client when credentials are configured.
///
/// Non-production environments talk to the sandbox endpoint unless an
/// explicit base URL overrides it.
fn build_gateway(config: &voltio_core::AppConfig) -> anyhow::Result<Option<Arc<GatewayClient>>> {
    let Some(creds) = &config.gateway else {
        return Ok(None);
    };

    let account = MerchantAccount {
        api_key: creds.api_key.clone(),
        merchant_id: creds.merchant_id.clone(),
        account_id: creds.account_id.clone(),
    };
    let timeout = config.gateway_request_timeout_secs;

    let client = match &config.gateway_base_url {
        Some(url) => GatewayClient::with_base_url(account, timeout, url)?,
        None => {
            let sandbox = !matches!(config.env, voltio_core::Environment::Production);
            GatewayClient::new(account, timeout, sandbox)?
        }
    };

    Ok(Some(Arc::new(client)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
