use dotenvy::dotenv;
use sisprof::router::init_router;
use sisprof::state::init_app_state;
use sisprof_config::ServerConfig;
use sisprof_observability::{init_metrics, init_tracing, metrics_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();
    let state = init_app_state().await.map_err(|err| err.error)?;

    if let Some(handle) = init_metrics()? {
        let metrics_listener =
            tokio::net::TcpListener::bind(server_config.metrics_address()).await?;
        tracing::info!(address = %server_config.metrics_address(), "metrics listener started");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(metrics_listener, metrics_app(handle)).await {
                tracing::error!(error = %err, "metrics listener stopped");
            }
        });
    }

    let app = init_router(state);
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    tracing::info!(address = %server_config.address(), "server running");
    tracing::info!("Scalar UI available at /scalar");
    axum::serve(listener, app).await?;

    Ok(())
}
