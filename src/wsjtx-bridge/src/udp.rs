// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;
use tracing::{info, trace};

use wsjtx_core::{SendFuture, Transport, TransportError};
use wsjtx_protocol::MAX_DATAGRAM_SIZE;

/// UDP transport: one bound socket for inbound datagrams, a fresh connected
/// socket for every outbound one.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: String,
    connect_timeout: Duration,
}

impl UdpTransport {
    pub async fn bind(
        listen: SocketAddr,
        peer: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(listen)
            .await
            .map_err(|e| TransportError::Bind {
                addr: listen.to_string(),
                message: e.to_string(),
            })?;
        let transport = Self {
            socket,
            peer: peer.into(),
            connect_timeout,
        };
        info!(
            "Listening for WSJT-X on {}, replies go to {}",
            transport.local_addr()?,
            transport.peer
        );
        Ok(transport)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket
            .local_addr()
            .map_err(|e| TransportError::Receive(e.to_string()))
    }

    async fn connect(&self) -> Result<UdpSocket, TransportError> {
        let connect_err = |message: String| TransportError::Connect {
            addr: self.peer.clone(),
            message,
        };

        let target = lookup_host(self.peer.as_str())
            .await
            .map_err(|e| connect_err(e.to_string()))?
            .next()
            .ok_or_else(|| connect_err("no address resolved".to_string()))?;

        let local: SocketAddr = match target.ip() {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| connect_err(e.to_string()))?;
        socket
            .connect(target)
            .await
            .map_err(|e| connect_err(e.to_string()))?;
        Ok(socket)
    }

    async fn send_packet(&self, packet: &[u8]) -> Result<(), TransportError> {
        let socket = timeout(self.connect_timeout, self.connect())
            .await
            .map_err(|_| TransportError::Timeout {
                addr: self.peer.clone(),
            })??;

        let sent = socket.send(packet).await.map_err(|e| TransportError::Send {
            addr: self.peer.clone(),
            message: e.to_string(),
        })?;
        if sent != packet.len() {
            return Err(TransportError::Send {
                addr: self.peer.clone(),
                message: format!("short write ({} of {} bytes)", sent, packet.len()),
            });
        }
        trace!("sent {} bytes to {}", sent, self.peer);
        Ok(())
    }
}

impl Transport for UdpTransport {
    fn send<'a>(&'a self, packet: &'a [u8]) -> SendFuture<'a> {
        Box::pin(self.send_packet(packet))
    }

    fn try_receive(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        match self.socket.try_recv_from(&mut buf) {
            Ok((len, from)) => {
                trace!("received {} bytes from {}", len, from);
                Ok(Some(buf[..len].to_vec()))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(TransportError::Receive(e.to_string())),
        }
    }
}
