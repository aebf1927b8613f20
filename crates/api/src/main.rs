use anyhow::Context;

use todoapi_api::app::{build_app, services};
use todoapi_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todoapi_observability::init();

    let config = AppConfig::from_env()?;
    let services = services::build_services(&config).await?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
