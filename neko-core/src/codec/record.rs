//! Helpers called by `#[derive(Reflect)]`-generated `Encode`/`Decode` impls
//! for the "reflected record" shapes in the §4.3 table. The derive macro
//! still emits the per-field sequence itself (so it can interleave
//! `flatten`/`skippable` decisions using each field's own [`crate::TagSet`]),
//! but every shared piece of framing logic lives here once instead of being
//! re-emitted as macro-generated boilerplate per field.

use crate::{CodecError, Decode, Encode, Input, Output};

/// Object-shape reflected record (§4.3 table): `start_object(field_count)`,
/// emit each field as a name_value_pair (via `body`), `end_object`.
pub fn encode_object_shape<O: Output>(
    out: &mut O,
    field_count: usize,
    body: impl FnOnce(&mut O) -> Result<(), O::Error>,
) -> Result<(), O::Error> {
    out.start_object(field_count)?;
    body(out)?;
    out.end_object()
}

/// `start_node`, run `body` (which resolves each field by name via
/// `Input::probe_name`), `finish_node`.
pub fn decode_object_shape<I: Input>(
    inp: &mut I,
    body: impl FnOnce(&mut I) -> Result<(), I::Error>,
) -> Result<(), I::Error> {
    if !inp.start_node()? {
        return Err(CodecError::structural("expected an object").into());
    }
    match body(inp) {
        Ok(()) => inp.finish_node(true),
        Err(e) => {
            inp.finish_node(false)?;
            Err(e)
        }
    }
}

/// Array-shape reflected record, no field names (§4.3 table):
/// `start_array(field_count)`, save each field in order, `end_array`.
pub fn encode_array_shape<O: Output>(
    out: &mut O,
    field_count: usize,
    body: impl FnOnce(&mut O) -> Result<(), O::Error>,
) -> Result<(), O::Error> {
    out.start_array(field_count)?;
    body(out)?;
    out.end_array()
}

/// `start_node`, size must equal `field_count` (the array shape disallows
/// optional fields so the count is always exact), load each field in
/// order, `finish_node`.
pub fn decode_array_shape<I: Input>(
    inp: &mut I,
    field_count: usize,
    body: impl FnOnce(&mut I) -> Result<(), I::Error>,
) -> Result<(), I::Error> {
    if !inp.start_node()? {
        return Err(CodecError::structural("expected an array").into());
    }
    let len = inp.size_tag()?;
    if len != field_count {
        inp.finish_node(false)?;
        return Err(CodecError::size_mismatch(field_count, len).into());
    }
    match body(inp) {
        Ok(()) => inp.finish_node(true),
        Err(e) => {
            inp.finish_node(false)?;
            Err(e)
        }
    }
}

/// Emit one plain (non-optional) field as a name_value_pair.
pub fn encode_field<O: Output, T: Encode>(
    out: &mut O,
    name: &str,
    value: &T,
) -> Result<(), O::Error> {
    out.name_value_pair(name, &mut |o| value.encode(o))
}

/// Emit an `Option<T>`-typed field: emits `null` normally, but omits the
/// key entirely when `skippable` is set, the value is `None`, and the
/// backend supports key omission — the "skippable combined with an
/// optional-like target" rule of §4.2. A backend that can't represent an
/// absent key unambiguously (binary, via
/// [`Output::supports_key_omission`]) always writes the `null` instead.
pub fn encode_optional_field<O: Output, T: Encode>(
    out: &mut O,
    name: &str,
    value: &Option<T>,
    skippable: bool,
) -> Result<(), O::Error> {
    match value {
        Some(v) => out.name_value_pair(name, &mut |o| v.encode(o)),
        None if skippable && out.supports_key_omission() => Ok(()),
        None => out.name_value_pair(name, &mut |o| o.save_null()),
    }
}

/// Emit a `raw_string`-tagged field: the string is written through
/// verbatim (already well-formed JSON text) rather than quoted/escaped.
pub fn encode_raw_field<O: Output>(out: &mut O, name: &str, text: &str) -> Result<(), O::Error> {
    out.name_value_pair(name, &mut |o| o.save_raw(text))
}

/// Resolve a `raw_string`-tagged field by name.
pub fn decode_raw_field<I: Input>(inp: &mut I, name: &str) -> Result<String, I::Error> {
    if !inp.probe_name(name)? {
        return Err(CodecError::missing_field(name).into());
    }
    inp.load_raw()
}

/// Resolve a required field by name; missing ⇒ schema error (§8 invariant
/// 8: "a non-skippable field absent from the input fails deserialization
/// of the enclosing record").
pub fn decode_field<I: Input, T: Decode>(inp: &mut I, name: &str) -> Result<T, I::Error> {
    if !inp.probe_name(name)? {
        return Err(CodecError::missing_field(name).into());
    }
    T::decode(inp)
}

/// Emit a `fixed_length`-tagged array field (§3): native-width elements,
/// no length prefix, since both ends already know `N` statically.
pub fn encode_fixed_field<O: Output, T: Encode, const N: usize>(
    out: &mut O,
    name: &str,
    arr: &[T; N],
) -> Result<(), O::Error> {
    out.name_value_pair(name, &mut |out| {
        out.start_fixed_array(N)?;
        for item in arr {
            item.encode(out)?;
        }
        out.end_array()
    })
}

/// Resolve a `fixed_length`-tagged array field by name.
pub fn decode_fixed_field<I: Input, T: Decode + Copy + Default, const N: usize>(
    inp: &mut I,
    name: &str,
) -> Result<[T; N], I::Error> {
    if !inp.probe_name(name)? {
        return Err(CodecError::missing_field(name).into());
    }
    if !inp.start_fixed_node(N)? {
        return Err(CodecError::structural("expected a fixed-length array").into());
    }
    let mut out = [T::default(); N];
    for slot in out.iter_mut() {
        *slot = T::decode(inp)?;
    }
    inp.finish_node(true)?;
    Ok(out)
}

/// Resolve an `Option<T>`-typed field by name; absent ⇒ `None` when
/// `skippable` (§8 invariant 8's other half), missing non-skippable ⇒
/// schema error.
pub fn decode_optional_field<I: Input, T: Decode>(
    inp: &mut I,
    name: &str,
    skippable: bool,
) -> Result<Option<T>, I::Error> {
    if !inp.probe_name(name)? {
        return if skippable {
            Ok(None)
        } else {
            Err(CodecError::missing_field(name).into())
        };
    }
    Option::<T>::decode(inp)
}
