use std::fmt;

use neko_core::CodecError;

/// The JSON backend's concrete error type. Wraps [`CodecError`] (the
/// generic schema/structural failures every codec in `neko-core` can
/// raise) plus the handful of failure modes specific to this backend: a
/// `serde_json` parse error from the DOM reader, or a tokenizing error
/// from the hand-rolled streaming reader.
#[derive(Debug)]
pub enum JsonError {
    Codec(CodecError),
    Parse(serde_json::Error),
    /// Raised by the streaming tokenizer (`stream_reader`), which doesn't
    /// go through `serde_json` at all.
    Token { message: String, offset: usize },
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "JSON parse error: {e}"),
            Self::Token { message, offset } => {
                write!(f, "JSON tokenizing error at byte {offset}: {message}")
            }
        }
    }
}

impl std::error::Error for JsonError {}

impl From<CodecError> for JsonError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
