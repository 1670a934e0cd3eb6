mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use followpulse_store::{build_resolver, open_store, Recorder};
use tracing_subscriber::EnvFilter;

use crate::{api::build_app, api::AppState, middleware::RateLimitState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = followpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let demo = followpulse_core::load_demo_profiles(config.demo_profiles_path.as_deref())?;
    let store = open_store(
        config.firebase.as_ref(),
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let resolver = build_resolver(&config, &store, demo)?;

    let state = AppState {
        resolver: Arc::new(resolver),
        recorder: Recorder::new(store),
    };
    let rate_limit = RateLimitState::new(config.rate_limit_per_minute, Duration::from_secs(60));
    let app = build_app(state, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "followpulse server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
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
