use roster_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.service.environment,
        port = config.service.port,
        "Application starting"
    );

    let state = match AppState::from_config(config.clone()) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!("Failed to load directory: {}", err);
            return Err(err);
        }
    };

    let app = build_router(state);

    Server::new(config).serve(app).await
}
