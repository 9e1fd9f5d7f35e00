use pictor_core::Config;

// mimalloc keeps fragmentation low for the many short-lived upload buffers, notably on musl.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let app = pictor_api::setup::initialize_app(config.clone()).await?;

    let result =
        pictor_api::setup::server::start_server(&config, app.router, app.state.shutdown.clone())
            .await;

    app.pool.close().await;
    tracing::info!("Database pool closed");

    result
}
