use clap::Parser;
use fuzzy_racer_lib::ServerConfig;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level())
        .with_target(true)
        .with_thread_ids(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    // library code logs through the `log` facade
    tracing_log::LogTracer::init()?;

    tracing::info!("Fuzzy Racer v{}", env!("CARGO_PKG_VERSION"));

    fuzzy_racer_lib::run(config).await?;
    Ok(())
}
