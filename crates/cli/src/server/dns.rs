use bond_dns_infrastructure::dns::DnsServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub async fn start_dns_server(
    bind_addr: SocketAddr,
    server: Arc<DnsServer>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let udp = UdpSocket::bind(bind_addr).await?;
    let tcp = TcpListener::bind(bind_addr).await?;

    info!(bind_address = %bind_addr, server = server.server_name(), "DNS server ready");

    let mut listeners = JoinSet::new();
    listeners.spawn(Arc::clone(&server).serve_udp(udp, shutdown.clone()));
    listeners.spawn(server.serve_tcp(tcp, shutdown));

    while let Some(result) = listeners.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "DNS listener failed"),
            Err(e) => error!(error = %e, "DNS listener task panicked"),
        }
    }

    Ok(())
}
