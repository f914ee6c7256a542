//! Length-prefixed binary backend for the Serializer Protocol (§4.5):
//! in-order, no self-description. Field names are never written; a
//! decode call only makes sense against the same record type an encode
//! call produced it from.

mod error;
mod reader;
mod writer;

pub use error::BinaryError;
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

use neko_core::{CodecError, Decode, Encode};

/// Encode `value` to its binary representation.
pub fn to_bytes<T: Encode>(value: &T) -> Result<Vec<u8>, BinaryError> {
    let mut writer = BinaryWriter::new();
    value.encode(&mut writer)?;
    writer.finish()
}

/// Decode a `T` from a complete binary buffer. Errors if any trailing
/// bytes are left over once the value has been fully read — a length
/// mismatch almost always means the caller handed in the wrong buffer
/// or the wrong type.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T, BinaryError> {
    let mut reader = BinaryReader::new(bytes);
    let value = T::decode(&mut reader)?;
    if reader.remaining() != 0 {
        return Err(CodecError::structural(format!(
            "{} trailing byte(s) after decoding the value",
            reader.remaining()
        ))
        .into());
    }
    Ok(value)
}

/// Base64 helper for embedding a raw byte run inside an otherwise
/// textual backend (§4.5: "a Base64 helper available for encoding raw
/// byte runs inside otherwise textual backends"), e.g. a `Vec<u8>` field
/// serialized through the JSON backend as a string rather than an array
/// of per-byte numbers.
pub fn encode_base64(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Inverse of [`encode_base64`].
pub fn decode_base64(text: &str) -> Result<Vec<u8>, BinaryError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|e| CodecError::schema(format!("invalid base64: {e}")).into())
}
