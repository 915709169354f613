use bond_dns_domain::CliOverrides;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "bond-dns")]
#[command(version = "0.1.0")]
#[command(about = "Bond DNS - resolves names published through a registry and Nostr relays")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Metrics and readiness port
    #[arg(short = 'm', long)]
    metrics_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Handler directive, e.g. "bond registry.local:8080"
    #[arg(long, value_name = "DIRECTIVE")]
    bond: Option<String>,

    /// Upstream resolver for names the registry does not know (ip:port)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        metrics_port: cli.metrics_port,
        bind_address: cli.bind.clone(),
        directive: cli.bond.clone(),
        upstream: cli.upstream.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config)?;

    info!("Starting Bond DNS v{}", env!("CARGO_PKG_VERSION"));
    info!(
        dns_port = config.server.dns_port,
        metrics_port = config.server.metrics_port,
        upstream = ?config.fallthrough.upstream,
        "Configuration loaded"
    );

    let services = di::DnsServices::new(&config)?;
    let shutdown = CancellationToken::new();

    let dns_addr = config.server.socket_addr(config.server.dns_port)?;
    let dns_task = {
        let dns_server = services.server.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = server::start_dns_server(dns_addr, dns_server, shutdown).await {
                error!(error = %e, "DNS server error");
            }
        })
    };

    let metrics_addr = config.server.socket_addr(config.server.metrics_port)?;
    let web_state = server::WebState {
        registry: services.metrics.clone(),
        handler: services.handler.clone(),
    };

    tokio::select! {
        result = server::start_web_server(metrics_addr, web_state, shutdown.clone()) => {
            if let Err(e) = result {
                error!(error = %e, "Metrics server error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    shutdown.cancel();
    let _ = dns_task.await;

    info!("Server shutdown complete");
    Ok(())
}
