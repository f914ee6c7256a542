//! JSON backend for the Serializer Protocol (§4.4), RFC 8259 text.
//!
//! Two [`neko_core::Input`] implementations share the contract: a DOM
//! reader ([`JsonDomReader`]) that parses the whole document up front, and
//! a streaming cursor ([`JsonStreamReader`]) that defers parsing a node's
//! contents until the node is entered. There is a single
//! [`neko_core::Output`] implementation ([`JsonWriter`]); the output
//! formatting knobs in [`JsonOptions`] apply to it.

mod dom_reader;
mod error;
mod options;
mod stream_reader;
mod writer;

pub use dom_reader::JsonDomReader;
pub use error::JsonError;
pub use options::{Indent, JsonOptions};
pub use stream_reader::JsonStreamReader;
pub use writer::JsonWriter;

use neko_core::{Decode, Encode};

/// Encode `value` to a JSON string using the default (DOM) writer.
pub fn to_string<T: Encode>(value: &T, options: &JsonOptions) -> Result<String, JsonError> {
    let mut writer = JsonWriter::new();
    value.encode(&mut writer)?;
    let text = writer.finish(options)?;
    log::trace!("encoded {} bytes of JSON", text.len());
    Ok(text)
}

/// Decode `T` from a JSON string using the DOM reader.
pub fn from_str<T: Decode>(text: &str) -> Result<T, JsonError> {
    let mut reader = JsonDomReader::new(text)?;
    T::decode(&mut reader)
}

/// Decode `T` from a JSON string using the streaming reader, honoring
/// `options` (notably the "None"-as-`null` compatibility toggle).
pub fn from_str_streaming<T: Decode>(text: &str, options: JsonOptions) -> Result<T, JsonError> {
    let mut reader = JsonStreamReader::with_options(text, options)?;
    T::decode(&mut reader)
}
