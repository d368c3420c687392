use as112d::{
    config::DnsConfig,
    error::ConfigError,
    graceful_shutdown::GracefulShutdown,
    handler::QueryHandler,
    server::DnsServer,
    zone::Catalog,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "as112d")]
#[command(version)]
#[command(about = "Authoritative blackhole server for private-use reverse DNS zones")]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to serve UDP and TCP on
    #[arg(short = 'b', long)]
    bind: Option<SocketAddr>,

    /// TCP listen backlog
    #[arg(long)]
    tcp_backlog: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

/// Defaults, then the config file, then AS112_* variables, then flags.
fn load_config(cli: &Cli) -> Result<DnsConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => DnsConfig::from_file(path)?,
        None => DnsConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(backlog) = cli.tcp_backlog {
        config.tcp_backlog = backlog;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting as112d v{}", env!("CARGO_PKG_VERSION"));

    let catalog = Arc::new(Catalog::build()?);
    info!("Serving {} reverse zones", catalog.len());
    for zone in catalog.iter() {
        tracing::debug!("Zone {}", zone.apex());
    }

    let handler = Arc::new(QueryHandler::new(catalog));
    let server = DnsServer::bind(&config, handler).await?;
    info!("Bound to {} (tcp backlog {})", server.local_addr()?, config.tcp_backlog);

    let shutdown = GracefulShutdown::new(Duration::from_secs(5));
    let shutdown_tx = shutdown.sender().clone();
    let server_task = tokio::spawn(async move { server.run(&shutdown_tx).await });

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    shutdown.shutdown(server_task).await;

    Ok(())
}
