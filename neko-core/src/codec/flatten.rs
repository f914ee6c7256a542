use super::{Decode, Encode};
use crate::{Input, Output};

/// Implemented alongside `Encode`/`Decode` by every `#[derive(Reflect)]`
/// struct, in addition to those two traits. A `flatten`-tagged sub-record
/// field (§4.3: "a `flatten`-tagged sub-record is encoded as if its fields
/// were members of the enclosing object") calls `encode_fields`/
/// `decode_fields` instead of going through a nested `name_value_pair`, so
/// the sub-record's own `start_object`/`end_object` are elided.
pub trait FlattenFields: Encode + Decode {
    fn encode_fields<O: Output>(&self, out: &mut O) -> Result<(), O::Error>;
    fn decode_fields<I: Input>(inp: &mut I) -> Result<Self, I::Error>
    where
        Self: Sized;
}
