use super::{Decode, Encode};
use crate::{Input, Output};

/// Each width dispatches to the matching `save_iN`/`load_iN` pair (§3:
/// "the binary encoder uses the host-width primitive") rather than always
/// widening to 64 bits — a format that doesn't care about width (JSON)
/// just defaults those back to the 64-bit call; one that does (binary)
/// overrides them to write/read exactly that many bytes. The narrowing
/// check on load (§4.4: a value that doesn't fit the target width fails
/// the load) lives in the trait's default `load_iN`/`load_uN` now, not
/// here.
macro_rules! impl_signed {
    ($($t:ty => $save:ident, $load:ident);* $(;)?) => {$(
        impl Encode for $t {
            fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
                out.$save(*self)
            }
        }
        impl Decode for $t {
            fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
                inp.$load()
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty => $save:ident, $load:ident);* $(;)?) => {$(
        impl Encode for $t {
            fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
                out.$save(*self)
            }
        }
        impl Decode for $t {
            fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
                inp.$load()
            }
        }
    )*};
}

impl_signed!(
    i8 => save_i8, load_i8;
    i16 => save_i16, load_i16;
    i32 => save_i32, load_i32;
    i64 => save_i64, load_i64;
);
impl_unsigned!(
    u8 => save_u8, load_u8;
    u16 => save_u16, load_u16;
    u32 => save_u32, load_u32;
    u64 => save_u64, load_u64;
);

impl Encode for bool {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.save_bool(*self)
    }
}
impl Decode for bool {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        inp.load_bool()
    }
}

impl Encode for f32 {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.save_f64(f64::from(*self))
    }
}
impl Decode for f32 {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        Ok(inp.load_f64()? as f32)
    }
}

impl Encode for f64 {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.save_f64(*self)
    }
}
impl Decode for f64 {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        inp.load_f64()
    }
}

impl Encode for String {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.save_str(self)
    }
}
impl Decode for String {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        inp.load_string()
    }
}

impl Encode for &str {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.save_str(self)
    }
}

impl Encode for () {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.save_null()
    }
}
impl Decode for () {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        inp.load_null()
    }
}
