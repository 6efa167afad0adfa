use std::sync::Arc;

use anyhow::Context;
use axum::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_app::{config::Config, create_router, db, AppState};

// Entry point of the application
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let pool = db::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let app_state = Arc::new(
        AppState::new(pool, &config.secret_key, config.bcrypt_cost)
            .context("failed to load page templates")?,
    );
    let app = create_router(app_state);

    tracing::info!(addr = %config.bind_addr, "server started successfully");

    Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
