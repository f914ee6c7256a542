use async_trait::async_trait;

use crate::error::TransportError;

/// Message-framed byte channel (§6.3): delivers one whole request or
/// response message per [`MessageStream::recv`], accepts one on
/// [`MessageStream::send`]. A transport implementation owns framing;
/// callers on top (the JSON-RPC engine) only ever see complete messages.
///
/// Single-producer single-consumer (§5): neither end may interleave a
/// partial message with another, so `send`/`recv` calls are not meant to
/// be pipelined concurrently against the same stream — the RPC client's
/// own call-serializing mutex (§4.9) is what enforces that above this
/// trait.
#[async_trait]
pub trait MessageStream: Send {
    /// Read one whole message. Returns [`TransportError::Disconnected`]
    /// on a clean peer close and [`TransportError::Cancelled`] if
    /// [`MessageStream::cancel`] fired while the read was pending.
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Write one whole message.
    async fn send(&mut self, message: &[u8]) -> Result<(), TransportError>;

    /// Release the underlying resource. Idempotent.
    async fn close(&mut self);

    /// Abort any `recv`/`send` currently pending on this stream, which
    /// resolves with [`TransportError::Cancelled`] (§5 "Cancellation
    /// semantics"). Implementations that have nothing in flight may treat
    /// this as a no-op until the next call.
    fn cancel(&self);
}

/// Accepts connected [`MessageStream`] peers (§6.3: "A listener variant
/// additionally provides `accept() → connected stream`").
#[async_trait]
pub trait MessageListener: Send {
    type Stream: MessageStream;

    async fn accept(&mut self) -> Result<Self::Stream, TransportError>;
}
