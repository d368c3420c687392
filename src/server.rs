use crate::{config::DnsConfig, error::Result, handler::QueryHandler};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream, UdpSocket};
use tokio::sync::{Semaphore, broadcast};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Largest datagram accepted on the UDP socket
const UDP_RECV_BUFFER: usize = 4096;

/// UDP and TCP listeners bound to the same address, sharing one handler
pub struct DnsServer {
    udp: Arc<UdpSocket>,
    tcp: TcpListener,
    handler: Arc<QueryHandler>,
    query_semaphore: Arc<Semaphore>,
    tcp_idle_timeout: Duration,
}

impl DnsServer {
    /// Bind both transports. With port 0 the TCP listener takes the port the
    /// UDP socket was given.
    pub async fn bind(config: &DnsConfig, handler: Arc<QueryHandler>) -> Result<Self> {
        let udp = UdpSocket::bind(config.bind_addr).await?;
        let addr = udp.local_addr()?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let tcp = socket.listen(config.tcp_backlog)?;

        Ok(Self {
            udp: Arc::new(udp),
            tcp,
            handler,
            query_semaphore: Arc::new(Semaphore::new(config.max_concurrent_queries)),
            tcp_idle_timeout: config.tcp_idle_timeout(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.udp.local_addr()?)
    }

    /// Serve until a shutdown signal arrives on `shutdown_tx`.
    pub async fn run(self, shutdown_tx: &broadcast::Sender<()>) -> Result<()> {
        let udp = tokio::spawn(run_udp_server(
            self.udp,
            self.handler.clone(),
            self.query_semaphore.clone(),
            shutdown_tx.subscribe(),
        ));
        let tcp = tokio::spawn(run_tcp_server(
            self.tcp,
            self.handler,
            self.query_semaphore,
            self.tcp_idle_timeout,
            shutdown_tx.subscribe(),
        ));

        for (name, task) in [("UDP", udp), ("TCP", tcp)] {
            match task.await {
                Ok(Ok(())) => debug!("{} server stopped", name),
                Ok(Err(e)) => error!("{} server failed: {}", name, e),
                Err(e) => error!("{} server task panicked: {}", name, e),
            }
        }
        Ok(())
    }
}

/// Run UDP server with graceful shutdown support
pub async fn run_udp_server(
    sock: Arc<UdpSocket>,
    handler: Arc<QueryHandler>,
    query_semaphore: Arc<Semaphore>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    info!("UDP DNS server listening on {}", sock.local_addr()?);
    let mut buf = vec![0u8; UDP_RECV_BUFFER];

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("UDP server received shutdown signal");
                break;
            }

            result = sock.recv_from(&mut buf) => {
                let (read_bytes, src_addr) = match result {
                    Ok(received) => received,
                    Err(e) => {
                        warn!("UDP receive error: {}", e);
                        continue;
                    }
                };

                let permit = match query_semaphore.clone().try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("Max concurrent queries reached, dropping query from {}", src_addr);
                        continue;
                    }
                };

                let query_data = buf[..read_bytes].to_vec();
                let handler = handler.clone();
                let sock = sock.clone();

                tokio::spawn(async move {
                    let _permit = permit;
                    match handler.handle_udp(&query_data) {
                        Ok(Some(response)) => {
                            if let Err(e) = sock.send_to(&response, src_addr).await {
                                error!("Failed to send UDP response to {}: {}", src_addr, e);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => debug!("Malformed UDP packet from {}: {}", src_addr, e),
                    }
                });
            }
        }
    }

    Ok(())
}

/// Run TCP server with graceful shutdown support
pub async fn run_tcp_server(
    listener: TcpListener,
    handler: Arc<QueryHandler>,
    query_semaphore: Arc<Semaphore>,
    idle_timeout: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    info!("TCP DNS server listening on {}", listener.local_addr()?);

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("TCP server received shutdown signal");
                break;
            }

            result = listener.accept() => {
                let (stream, src_addr) = match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("TCP accept error: {}", e);
                        continue;
                    }
                };
                let handler = handler.clone();
                let query_semaphore = query_semaphore.clone();

                tokio::spawn(async move {
                    if let Err(e) =
                        handle_tcp_connection(stream, src_addr, handler, query_semaphore, idle_timeout).await
                    {
                        debug!("TCP connection error from {}: {}", src_addr, e);
                    }
                });
            }
        }
    }

    Ok(())
}

async fn handle_tcp_connection(
    mut stream: TcpStream,
    src_addr: SocketAddr,
    handler: Arc<QueryHandler>,
    query_semaphore: Arc<Semaphore>,
    idle_timeout: Duration,
) -> Result<()> {
    let mut length_buf = [0u8; 2];

    loop {
        match timeout(idle_timeout, stream.read_exact(&mut length_buf)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("TCP connection closed by client {}", src_addr);
                break;
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                debug!("TCP connection from {} idle, closing", src_addr);
                break;
            }
        }

        let message_length = u16::from_be_bytes(length_buf) as usize;
        if message_length == 0 {
            break;
        }

        let mut message_buf = vec![0u8; message_length];
        match timeout(idle_timeout, stream.read_exact(&mut message_buf)).await {
            Ok(result) => {
                result?;
            }
            Err(_) => {
                debug!("TCP message from {} stalled, closing", src_addr);
                break;
            }
        }

        let _permit = match query_semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(
                    "Max concurrent queries reached, closing TCP connection from {}",
                    src_addr
                );
                break;
            }
        };

        match handler.handle_tcp(&message_buf) {
            Ok(Some(response)) => {
                let response_length = response.len() as u16;
                stream.write_all(&response_length.to_be_bytes()).await?;
                stream.write_all(&response).await?;
                stream.flush().await?;
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Malformed TCP packet from {}: {}", src_addr, e);
                break;
            }
        }
    }

    Ok(())
}
