//! UDP transport for upstream queries (RFC 1035 §4.2.1)
//!
//! One datagram out, one datagram back, bounded by the 512-byte message size.
//! Each attempt gets its own socket; only receive timeouts are retried.

use async_trait::async_trait;
use iterdns_application::ports::UpstreamExchange;
use iterdns_domain::{AaaaLayout, DomainError, Message, ResolverConfig, MAX_MESSAGE_SIZE};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

pub struct UdpTransport {
    timeout: Duration,
    attempts: u8,
    local_port: u16,
    aaaa_layout: AaaaLayout,
    /// Present only with a fixed local port, which admits one exchange at a time.
    port_lock: Option<Mutex<()>>,
}

impl UdpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            attempts: 1,
            local_port: 0,
            aaaa_layout: AaaaLayout::default(),
            port_lock: None,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.query_timeout())
            .with_attempts(config.retry_attempts)
            .with_local_port(config.outbound_port)
            .with_aaaa_layout(config.aaaa_layout)
    }

    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_local_port(mut self, port: u16) -> Self {
        self.local_port = port;
        self.port_lock = (port != 0).then(|| Mutex::new(()));
        self
    }

    pub fn with_aaaa_layout(mut self, aaaa_layout: AaaaLayout) -> Self {
        self.aaaa_layout = aaaa_layout;
        self
    }

    fn bind_socket(&self, server: SocketAddr) -> Result<UdpSocket, std::io::Error> {
        let (domain, ip) = if server.is_ipv4() {
            (Domain::IPV4, IpAddr::V4(Ipv4Addr::UNSPECIFIED))
        } else {
            (Domain::IPV6, IpAddr::V6(Ipv6Addr::UNSPECIFIED))
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&SocketAddr::new(ip, self.local_port).into())?;
        socket.set_nonblocking(true)?;

        let std_socket: std::net::UdpSocket = socket.into();
        UdpSocket::from_std(std_socket)
    }

    async fn exchange_once(
        &self,
        server: SocketAddr,
        query_bytes: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let socket = self.bind_socket(server).map_err(|e| {
            DomainError::NetworkIo(format!("Failed to bind UDP socket: {}", e))
        })?;

        let bytes_sent = socket.send_to(query_bytes, server).await.map_err(|e| {
            DomainError::NetworkIo(format!("Failed to send UDP query to {}: {}", server, e))
        })?;

        debug!(server = %server, bytes_sent, "UDP query sent");

        // Datagrams with a foreign ID are dropped; the attempt keeps listening
        // until its deadline.
        let deadline = Instant::now() + self.timeout;
        let mut recv_buf = [0u8; MAX_MESSAGE_SIZE];
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| DomainError::TransportTimeout {
                        server: server.to_string(),
                    })?
                    .map_err(|e| {
                        DomainError::NetworkIo(format!(
                            "Failed to receive UDP response from {}: {}",
                            server, e
                        ))
                    })?;

            if from_addr.ip() != server.ip() {
                warn!(
                    expected = %server,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
            }

            let response = &recv_buf[..bytes_received];
            if validate_response_id(query_bytes, response, server).is_err() {
                debug!(server = %server, bytes_received, "Discarding mismatched UDP response");
                continue;
            }

            debug!(server = %server, bytes_received, "UDP response received");
            return Ok(response.to_vec());
        }
    }
}

#[async_trait]
impl UpstreamExchange for UdpTransport {
    async fn query(&self, server: SocketAddr, mut request: Message) -> Result<Message, DomainError> {
        let query_bytes = request.to_bytes(self.aaaa_layout)?;

        let _port_guard = match &self.port_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let mut attempt = 1;
        let response_bytes = loop {
            match self.exchange_once(server, &query_bytes).await {
                Ok(bytes) => break bytes,
                Err(DomainError::TransportTimeout { .. }) if attempt < self.attempts => {
                    warn!(server = %server, attempt, "UDP query timed out, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        Ok(Message::from_bytes(&response_bytes)?)
    }
}

/// Rejects a reply whose ID differs from the query it answers.
pub(crate) fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    let (Some(query_id), Some(response_id)) = (query.get(..2), response.get(..2)) else {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Message from {} too short to carry an ID",
            server
        )));
    };

    if query_id != response_id {
        warn!(
            server = %server,
            expected = u16::from_be_bytes([query_id[0], query_id[1]]),
            received = u16::from_be_bytes([response_id[0], response_id[1]]),
            "DNS response ID mismatch"
        );
        return Err(DomainError::InvalidDnsResponse(format!(
            "Response ID mismatch from {}",
            server
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod tests;
