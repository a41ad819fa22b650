use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use category_scraper::cli::{commands, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    commands::scrape(&cli).await?;

    Ok(())
}
