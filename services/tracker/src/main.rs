use anyhow::Context as _;
use sea_orm::Database;
use tokio::signal;
use tracing::info;

use biblia_core::config::load_dotenv;
use biblia_core::tracing::init_tracing;
use biblia_tracker::config::TrackerConfig;
use biblia_tracker::infra::db::ensure_schema;
use biblia_tracker::infra::password::Argon2Hasher;
use biblia_tracker::router::build_router;
use biblia_tracker::state::AppState;

const DEFAULT_LOG_FILTER: &str = "biblia_tracker=info,tower_http=info,sea_orm=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();

    let config = TrackerConfig::from_env()?;
    init_tracing(DEFAULT_LOG_FILTER, config.log_json);
    if let Err(e) = dotenv {
        tracing::warn!(error = %e, "failed to read .env file");
    }

    let db = Database::connect(config.pool.connect_options(&config.database_url))
        .await
        .context("connect to database")?;
    ensure_schema(&db).await?;

    let state = AppState {
        db,
        hasher: Argon2Hasher::new(config.password_hash.params()?),
    };

    let router = build_router(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("tracker service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("tracker service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
