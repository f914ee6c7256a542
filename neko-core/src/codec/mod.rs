//! Generic Type Codecs (§4.3): save/load rules expressed once, against
//! [`crate::Output`]/[`crate::Input`], for every shape spec.md enumerates.
//! A reflected record's own `Encode`/`Decode` impl is generated by
//! `#[derive(Reflect)]` directly (so it can weave in per-field [`crate::TagSet`]
//! behavior), but it calls back into the helpers here for every field's
//! actual value, and the container/primitive impls below are used
//! verbatim with no per-type generation at all.

mod container;
mod flatten;
mod optional;
mod primitive;
mod record;
mod variant;

pub use container::AssocArray;
pub use flatten::FlattenFields;
pub use record::{
    decode_array_shape, decode_field, decode_fixed_field, decode_object_shape,
    decode_optional_field, decode_raw_field, encode_array_shape, encode_field,
    encode_fixed_field, encode_object_shape, encode_optional_field, encode_raw_field,
};
pub use variant::{decode_variant, encode_variant, VariantArm};

use crate::{Input, Output};

/// Save half of a type codec. Implemented for every primitive, every
/// standard container, `Option<T>`, tuples, and (via `#[derive(Reflect)]`)
/// every reflected record.
pub trait Encode {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error>;
}

/// Load half of a type codec.
pub trait Decode: Sized {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error>;
}
