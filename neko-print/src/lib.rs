//! Human-readable Print backend (§4.6): output only, a single line per
//! record in the form `{ name1 = value1, name2 = value2, ... }`, with
//! nested records recursing into the same shape. Grounded on
//! `original_source/core/dump_to_string.hpp`/`to_string.hpp`: the original
//! reuses the JSON writer's delimiter conventions but leaves values
//! unquoted, which is the same builder-tree-then-render shape
//! [`neko_json::JsonWriter`] uses — this writer follows it, minus a reader
//! half, since round-tripping through Print is explicitly not supported.

mod error;
mod writer;

pub use error::PrintError;
pub use writer::PrintWriter;

use neko_core::Encode;

/// Dump `value` to its single-line diagnostic form. The entry point the
/// spec's §4.6 contract actually asks for (`to_string(&T) -> String`),
/// rather than making every call site build a [`PrintWriter`] itself.
pub fn to_string<T: Encode>(value: &T) -> Result<String, PrintError> {
    let mut writer = PrintWriter::new();
    value.encode(&mut writer)?;
    Ok(writer.finish())
}
