use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::Notify;

use crate::error::TransportError;
use crate::stream::{MessageListener, MessageStream};

/// Default cap on a single framed message (§5: "an overlarge message is
/// a transport error, not a panic"). Plain data, not wire fragmentation —
/// unlike the ONC-RPC record mark this framing is modeled on, there is no
/// high "last fragment" bit and no support for multi-fragment records.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 16 * 1024 * 1024;

/// Encodes `payload.len()` as a 4-byte big-endian prefix and writes it
/// ahead of `payload`. Grounded on `rpc_protocol::update_record_mark`,
/// minus the ONC-RPC "last fragment" high bit this protocol has no use
/// for.
fn frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// A length-prefixed [`MessageStream`] over a [`TcpStream`] (§6.2).
pub struct TcpMessageStream {
    inner: TcpStream,
    max_message_len: usize,
    cancel: std::sync::Arc<Notify>,
}

impl TcpMessageStream {
    pub fn new(inner: TcpStream) -> Self {
        Self::with_max_message_len(inner, DEFAULT_MAX_MESSAGE_LEN)
    }

    pub fn with_max_message_len(inner: TcpStream, max_message_len: usize) -> Self {
        let _ = inner.set_nodelay(true);
        Self {
            inner,
            max_message_len,
            cancel: std::sync::Arc::new(Notify::new()),
        }
    }

    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        Ok(Self::new(TcpStream::connect(addr).await?))
    }
}

#[async_trait]
impl MessageStream for TcpMessageStream {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut len_bytes = [0u8; 4];
        tokio::select! {
            r = self.inner.read_exact(&mut len_bytes) => { r?; }
            _ = self.cancel.notified() => return Err(TransportError::Cancelled),
        }
        let len = u32::from_be_bytes(len_bytes) as usize;
        if len > self.max_message_len {
            return Err(TransportError::MessageTooLarge {
                limit: self.max_message_len,
                actual: len,
            });
        }
        let mut payload = vec![0u8; len];
        tokio::select! {
            r = self.inner.read_exact(&mut payload) => { r?; }
            _ = self.cancel.notified() => return Err(TransportError::Cancelled),
        }
        Ok(payload)
    }

    async fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        if message.len() > self.max_message_len {
            return Err(TransportError::MessageTooLarge {
                limit: self.max_message_len,
                actual: message.len(),
            });
        }
        let framed = frame(message);
        tokio::select! {
            r = self.inner.write_all(&framed) => { r?; }
            _ = self.cancel.notified() => return Err(TransportError::Cancelled),
        }
        Ok(())
    }

    async fn close(&mut self) {
        let _ = self.inner.shutdown().await;
    }

    fn cancel(&self) {
        self.cancel.notify_waiters();
    }
}

/// Accepts [`TcpMessageStream`] connections (§6.2/§6.3).
pub struct TcpMessageListener {
    inner: TcpListener,
    max_message_len: usize,
}

impl TcpMessageListener {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        Ok(Self {
            inner: TcpListener::bind(addr).await?,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.inner.local_addr()
    }

    pub fn with_max_message_len(mut self, max_message_len: usize) -> Self {
        self.max_message_len = max_message_len;
        self
    }
}

#[async_trait]
impl MessageListener for TcpMessageListener {
    type Stream = TcpMessageStream;

    async fn accept(&mut self) -> Result<Self::Stream, TransportError> {
        let (socket, _peer) = self.inner.accept().await?;
        Ok(TcpMessageStream::with_max_message_len(
            socket,
            self.max_message_len,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_message_through_loopback() {
        let listener = TcpMessageListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut listener = listener;

        let server = tokio::spawn(async move {
            let mut stream = listener.accept().await.unwrap();
            let msg = stream.recv().await.unwrap();
            stream.send(&msg).await.unwrap();
        });

        let mut client = TcpMessageStream::connect(addr).await.unwrap();
        client.send(b"hello").await.unwrap();
        let echoed = client.recv().await.unwrap();
        assert_eq!(echoed, b"hello");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn oversized_message_is_rejected_before_writing() {
        let listener = TcpMessageListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut listener = listener;
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let mut client =
            TcpMessageStream::with_max_message_len(TcpStream::connect(addr).await.unwrap(), 4);
        let err = client.send(b"too long").await.unwrap_err();
        assert!(matches!(err, TransportError::MessageTooLarge { .. }));
    }
}
