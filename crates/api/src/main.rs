use std::io::BufRead;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use salon_site_api::{app, config, jobs, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("hash-password") {
        return hash_password();
    }

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting salon site API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let state = app::AppState::new(config.clone(), pool.clone())?;

    let mut scheduler = jobs::JobScheduler::new();
    scheduler.register(jobs::PoolMetricsJob::new(pool));
    scheduler.register(jobs::DraftExpiryJob::new(
        state.drafts.clone(),
        Duration::from_secs(config.auth.session_ttl_secs.max(0) as u64),
    ));
    scheduler.start();

    let app = app::router(state);

    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown();
    scheduler
        .wait_for_shutdown(Duration::from_secs(10))
        .await;

    Ok(())
}

/// `salon-site hash-password [password]`: prints the Argon2id hash to put in
/// `auth.admin_password_hash`. Reads the password from stdin when no argument
/// is given.
fn hash_password() -> Result<()> {
    let password = match std::env::args().nth(2) {
        Some(password) => password,
        None => {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    println!("{}", shared::password::hash_password(&password)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
