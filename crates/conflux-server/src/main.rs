use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use conflux_server::{ConfluxServer, ServerConfig};

#[derive(Parser)]
#[command(
    name = "conflux-server",
    version,
    about = "Conflux — event ingestion and correlation server",
    long_about = None
)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration file
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    ConfluxServer::with_default_pipeline(config).serve().await?;
    Ok(())
}
