use std::fmt;

/// Transport-layer failure (§7: "transport: disconnect, cancellation,
/// size limit"). Distinct from [`neko_core::CodecError`]/the backend
/// errors: those are about whether *bytes* decode into a value, this is
/// about whether a whole *message* ever successfully crossed the wire.
#[derive(Debug)]
pub enum TransportError {
    Io(std::io::Error),
    /// The peer closed the connection (or the socket otherwise became
    /// unusable) mid-read.
    Disconnected,
    /// A message exceeded the transport's configured limit — the TCP
    /// framing's max length, or UDP's 1500-byte datagram cap (§5, §6.2).
    MessageTooLarge { limit: usize, actual: usize },
    /// A pending `recv`/`send` was aborted by [`crate::MessageStream::cancel`].
    Cancelled,
    /// A length-prefixed frame's header didn't parse, or a UDP datagram
    /// contained more than exactly one JSON value (§ original_source's
    /// `datagram_wapper.hpp` validates the embedded length before
    /// trusting it; we validate the decoded text is exactly one value).
    Framing(String),
    /// A URL passed to [`crate::connect`]/[`crate::listen`] didn't match
    /// `tcp://HOST:PORT` or `udp://BIND-REMOTE` (§6.2).
    InvalidUrl(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Io(e) => write!(f, "I/O error: {e}"),
            TransportError::Disconnected => write!(f, "transport disconnected"),
            TransportError::MessageTooLarge { limit, actual } => write!(
                f,
                "message of {actual} bytes exceeds the {limit}-byte transport limit"
            ),
            TransportError::Cancelled => write!(f, "operation cancelled"),
            TransportError::Framing(msg) => write!(f, "framing error: {msg}"),
            TransportError::InvalidUrl(url) => write!(f, "invalid transport URL `{url}`"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            TransportError::Disconnected
        } else {
            TransportError::Io(e)
        }
    }
}
