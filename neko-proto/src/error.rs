use std::fmt;

/// Failure modes of the Protocol Registry (§4.8) and its `IProto` handles.
#[derive(Debug)]
pub enum ProtoError {
    /// `create`/`create_by_id` found no registration under that name/id.
    Unknown(String),
    /// The registered wire format's codec failed to encode the value.
    Encode(String),
    /// The registered wire format's codec failed to decode the bytes.
    Decode(String),
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtoError::Unknown(what) => write!(f, "no protocol registered for `{what}`"),
            ProtoError::Encode(msg) => write!(f, "encode failed: {msg}"),
            ProtoError::Decode(msg) => write!(f, "decode failed: {msg}"),
        }
    }
}

impl std::error::Error for ProtoError {}
