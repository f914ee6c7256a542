//! Reflection-driven field description, the serializer protocol, and the
//! generic type codecs that every backend (JSON, binary, print, reflection)
//! is built against.
//!
//! The one invariant everything here exists to serve: a record type
//! describes its own fields exactly once, via [`Reflect`], and every codec
//! in [`codec`] is written generically against [`Output`]/[`Input`] rather
//! than against any particular wire format.

mod error;
mod reflect;
mod ser;
mod tags;

pub mod codec;

pub use codec::{
    decode_array_shape, decode_field, decode_fixed_field, decode_object_shape,
    decode_optional_field, decode_raw_field, decode_variant, encode_array_shape, encode_field,
    encode_fixed_field, encode_object_shape, encode_optional_field, encode_raw_field,
    encode_variant, AssocArray, Decode, Encode, FlattenFields, VariantArm,
};
pub use error::{CodecError, Severity};
pub use reflect::{FieldRef, FieldRefMut, Reflect};
pub use ser::{Input, NodeKind, Output};
pub use tags::{FieldTag, TagSet};

/// Depth limit applied by every composite-descending codec, per §9 of the
/// design notes ("cyclic object graphs ... implementers should ... reject
/// cycles with a depth-limit check"). Tree-shaped data in practice never
/// comes close to this; it exists purely to turn an accidental cycle into a
/// clean error instead of a stack overflow.
pub const MAX_NESTING_DEPTH: usize = 128;
