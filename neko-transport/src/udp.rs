use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::sync::Notify;

use crate::error::TransportError;
use crate::stream::MessageStream;

/// A UDP datagram carries exactly one message and is not length-prefixed
/// (unlike [`crate::tcp`]): the socket's own framing is the message
/// framing. Grounded on `original_source`'s `DatagramClient<UdpClient>`,
/// which allocates a fixed 1500-byte buffer and rejects any `send` whose
/// payload would not fit in one datagram.
pub const UDP_MAX_DATAGRAM_LEN: usize = 1500;

/// A connected UDP [`MessageStream`] (§6.2): bound locally, with a single
/// fixed remote peer, mirroring `udp://BIND_HOST:BIND_PORT-REMOTE_HOST:REMOTE_PORT`.
pub struct UdpMessageStream {
    socket: UdpSocket,
    cancel: std::sync::Arc<Notify>,
}

impl UdpMessageStream {
    /// Binds `bind_addr` and fixes `remote_addr` as the only peer this
    /// stream will exchange datagrams with, via `connect` (so `send`/`recv`
    /// use the connected-socket send/recv rather than sendto/recvfrom).
    pub async fn bind_connected(
        bind_addr: std::net::SocketAddr,
        remote_addr: std::net::SocketAddr,
    ) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(remote_addr).await?;
        Ok(Self {
            socket,
            cancel: std::sync::Arc::new(Notify::new()),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl MessageStream for UdpMessageStream {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut buf = [0u8; UDP_MAX_DATAGRAM_LEN];
        let len = tokio::select! {
            r = self.socket.recv(&mut buf) => r?,
            _ = self.cancel.notified() => return Err(TransportError::Cancelled),
        };
        Ok(buf[..len].to_vec())
    }

    async fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        if message.len() >= UDP_MAX_DATAGRAM_LEN {
            return Err(TransportError::MessageTooLarge {
                limit: UDP_MAX_DATAGRAM_LEN,
                actual: message.len(),
            });
        }
        let sent = tokio::select! {
            r = self.socket.send(message) => r?,
            _ = self.cancel.notified() => return Err(TransportError::Cancelled),
        };
        if sent != message.len() {
            return Err(TransportError::Framing(format!(
                "datagram send wrote {sent} of {} bytes",
                message.len()
            )));
        }
        Ok(())
    }

    async fn close(&mut self) {}

    fn cancel(&self) {
        self.cancel.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_datagram_between_two_bound_sockets() {
        let a_probe = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let a_addr = a_probe.local_addr().unwrap();
        drop(a_probe);
        let b_probe = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let b_addr = b_probe.local_addr().unwrap();
        drop(b_probe);

        let mut a = UdpMessageStream::bind_connected(a_addr, b_addr).await.unwrap();
        let mut b = UdpMessageStream::bind_connected(b_addr, a_addr).await.unwrap();

        a.send(b"ping").await.unwrap();
        let got = b.recv().await.unwrap();
        assert_eq!(got, b"ping");
    }

    #[tokio::test]
    async fn oversized_datagram_is_rejected() {
        let a: std::net::SocketAddr = "127.0.0.1:0".parse().unwrap();
        let b: std::net::SocketAddr = "127.0.0.1:0".parse().unwrap();
        let mut stream = UdpMessageStream::bind_connected(a, b).await.unwrap();
        let big = vec![0u8; UDP_MAX_DATAGRAM_LEN];
        let err = stream.send(&big).await.unwrap_err();
        assert!(matches!(err, TransportError::MessageTooLarge { .. }));
    }
}
