use std::fmt;

use neko_core::CodecError;

/// The Print backend's error type. Print only ever writes, and it has no
/// format-specific failure mode of its own — every error it can produce is
/// a [`CodecError`] surfaced by the generic codecs (unbalanced composite
/// framing, depth exceeded).
#[derive(Debug)]
pub struct PrintError(pub CodecError);

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PrintError {}

impl From<CodecError> for PrintError {
    fn from(e: CodecError) -> Self {
        PrintError(e)
    }
}
