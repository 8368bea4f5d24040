use anyhow::Result;
use seqlink::config::{self, Config};
use seqlink::{server, supervisor};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    init_tracing(&config);

    if !config.is_worker() {
        config.print_summary();
    }

    if config.workers > 1 && !config.is_worker() {
        supervisor::run(config).await
    } else {
        server::run(config).await
    }
}

/// `RUST_LOG` wins over the configured level when both are set.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
