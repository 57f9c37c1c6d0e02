use dotenvy::dotenv;
use openhouse::logging::init_tracing;
use openhouse::openhouse_config::ServerConfig;
use openhouse::router::init_router;
use openhouse::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let server = ServerConfig::from_env();
    let state = init_app_state().await?;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(server.bind_address()).await?;
    tracing::info!(address = %server.bind_address(), "Server listening");
    tracing::info!("Swagger UI available at /swagger-ui");
    axum::serve(listener, app).await?;
    Ok(())
}
