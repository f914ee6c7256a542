use std::fmt;

use neko_core::CodecError;

/// The binary backend's concrete error type (§4.5). Binary has no tokens
/// to mis-parse the way JSON does — its two failure modes are a
/// `CodecError` surfaced by the generic codecs (missing field, size
/// mismatch, depth exceeded, ...) and running out of bytes mid-read.
#[derive(Debug)]
pub enum BinaryError {
    Codec(CodecError),
    /// A read needed more bytes than remained in the buffer.
    Truncated { needed: usize, available: usize },
    /// A length-prefixed string's bytes were not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for BinaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryError::Codec(e) => write!(f, "{e}"),
            BinaryError::Truncated { needed, available } => {
                write!(f, "truncated input: needed {needed} bytes, {available} remained")
            }
            BinaryError::InvalidUtf8 => write!(f, "string bytes were not valid UTF-8"),
        }
    }
}

impl std::error::Error for BinaryError {}

impl From<CodecError> for BinaryError {
    fn from(e: CodecError) -> Self {
        BinaryError::Codec(e)
    }
}
