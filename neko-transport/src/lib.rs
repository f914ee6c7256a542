//! Framed message transports (§6.2 Framing, §6.3 Message-Stream
//! Interface): TCP with a 4-byte big-endian length prefix and UDP where
//! one datagram is one message, behind the common [`MessageStream`] /
//! [`MessageListener`] traits the JSON-RPC engine is built on.

mod error;
mod stream;
mod tcp;
mod udp;
mod url;

pub use error::TransportError;
pub use stream::{MessageListener, MessageStream};
pub use tcp::{TcpMessageListener, TcpMessageStream, DEFAULT_MAX_MESSAGE_LEN};
pub use udp::{UdpMessageStream, UDP_MAX_DATAGRAM_LEN};
pub use url::{parse as parse_url, TransportUrl};

/// Connects to `url` (`tcp://HOST:PORT` or `udp://BIND-REMOTE`) and
/// returns a boxed stream, for callers that don't want to match on
/// [`TransportUrl`] themselves.
pub async fn connect(url: &str) -> Result<Box<dyn MessageStream>, TransportError> {
    match parse_url(url)? {
        TransportUrl::Tcp(addr) => Ok(Box::new(TcpMessageStream::connect(addr).await?)),
        TransportUrl::Udp { bind, remote } => {
            Ok(Box::new(UdpMessageStream::bind_connected(bind, remote).await?))
        }
    }
}

/// Binds a TCP listener at `url` (`tcp://HOST:PORT`). UDP has no listener
/// concept here: a bound-and-connected [`UdpMessageStream`] is already a
/// usable peer, since the protocol is connectionless (§6.2).
pub async fn listen(url: &str) -> Result<TcpMessageListener, TransportError> {
    match parse_url(url)? {
        TransportUrl::Tcp(addr) => TcpMessageListener::bind(addr).await,
        TransportUrl::Udp { .. } => Err(TransportError::InvalidUrl(url.to_string())),
    }
}
