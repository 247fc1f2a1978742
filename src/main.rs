use {
    std::sync::Arc,
    tokio::{net::TcpListener, time::Duration},
    wetterblock::{
        config::RuntimeConfig,
        hub::BroadcastHub,
        scheduler::window_flush_task,
        server::build_router,
        state::RelayState,
        writer::{BlockWriter, CsvBlockWriter},
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RuntimeConfig::from_env()?;

    log::info!("Starting wetterblock relay...");
    log::info!("   Port: {}", config.port);
    log::info!("   State file: {}", config.state_file.display());
    log::info!("   Output dir: {}", config.output_dir.display());
    log::info!("   Window: {}s", config.window_secs);

    let state = Arc::new(RelayState::load(&config.state_file));
    let writer: Arc<dyn BlockWriter> = Arc::new(CsvBlockWriter::new(&config.output_dir)?);

    let scheduler_state = state.clone();
    tokio::spawn(async move {
        window_flush_task(
            scheduler_state,
            writer,
            Duration::from_secs(config.window_secs),
        )
        .await;
    });

    let hub = Arc::new(BroadcastHub::new(state));
    let app = build_router(hub);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    log::info!("Relay listening on port {}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}
