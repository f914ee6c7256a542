use super::{Decode, Encode};
use crate::{Input, Output};

/// Optional-like (§4.3 table): if empty, emit null (or omit entirely when
/// inside a `name_value_pair` under the flatten/skip rules — that omission
/// is handled by the record codec, not here); else recurse on the
/// contained value. On load: accept null as empty, else recurse.
impl<T: Encode> Encode for Option<T> {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        match self {
            Some(v) => {
                out.save_presence(true)?;
                v.encode(out)
            }
            None => out.save_presence(false),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        if inp.load_presence()? {
            Ok(Some(T::decode(inp)?))
        } else {
            Ok(None)
        }
    }
}
