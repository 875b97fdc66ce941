//! Transport abstraction for datagram-oriented inbound channels.
//!
//! Concrete implementations:
//! - UDP socket (non-blocking, the production path)
//! - [`NullTransport`] when no command channel is wanted
//!
//! The gateway is generic over `Transport`, so adding a new transport
//! requires zero changes to the decoding logic.  The protocol is
//! fire-and-forget: nothing is ever written back.

use std::io::ErrorKind;
use std::net::UdpSocket;

use log::{debug, info, warn};

use crate::error::{CommsError, Result};

/// Datagram-oriented, non-blocking receive channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Receive one datagram into `buf`.
    /// Returns the number of bytes received; 0 if nothing is pending.
    /// Never blocks.
    fn recv(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Self::Error>;

    /// Release the underlying channel.  Further `recv` calls fail.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// A null transport that never yields a datagram.
/// Useful as a default when no command client is expected.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = CommsError;

    fn recv(&mut self, _buf: &mut [u8]) -> core::result::Result<usize, CommsError> {
        Ok(0)
    }

    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        true
    }
}

/// Non-blocking UDP listener.
pub struct UdpTransport {
    socket: Option<UdpSocket>,
}

impl UdpTransport {
    /// Bind `addr:port` and switch the socket to non-blocking mode.
    pub fn bind(addr: &str, port: u16) -> Result<Self> {
        let socket = UdpSocket::bind((addr, port)).map_err(|e| {
            warn!("UDP: bind {}:{} failed: {}", addr, port, e);
            CommsError::BindFailed
        })?;
        socket.set_nonblocking(true).map_err(|e| {
            warn!("UDP: set_nonblocking failed: {}", e);
            CommsError::NonBlockingFailed
        })?;
        if let Ok(local) = socket.local_addr() {
            info!("UDP: listening on {}", local);
        }
        Ok(Self {
            socket: Some(socket),
        })
    }

    /// Bound address, `None` once closed.
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }
}

impl Transport for UdpTransport {
    type Error = CommsError;

    fn recv(&mut self, buf: &mut [u8]) -> core::result::Result<usize, CommsError> {
        let Some(socket) = self.socket.as_ref() else {
            return Err(CommsError::Closed);
        };
        match socket.recv_from(buf) {
            Ok((len, peer)) => {
                debug!("UDP: {} bytes from {}", len, peer);
                Ok(len)
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(e) => {
                warn!("UDP: recv failed: {}", e);
                Err(CommsError::RecvFailed)
            }
        }
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            info!("UDP: socket closed");
        }
    }

    fn is_open(&self) -> bool {
        self.socket.is_some()
    }
}
