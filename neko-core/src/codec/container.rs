use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use super::{Decode, Encode};
use crate::{CodecError, Input, Output};

/// Variable sequence (vector/list/deque, §4.3 table): `start_array(size)`,
/// iterate saves, `end_array` / `start_node`, size_tag sets the container
/// length, iterate loads, `finish_node`.
impl<T: Encode> Encode for Vec<T> {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.start_array(self.len())?;
        for item in self {
            item.encode(out)?;
        }
        out.end_array()
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        if !inp.start_node()? {
            return Err(CodecError::structural("expected an array").into());
        }
        let len = inp.size_tag()?;
        let mut out = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len {
            out.push(T::decode(inp)?);
        }
        inp.finish_node(true)?;
        Ok(out)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    /// Fixed-length sequence (§4.3 table): `start_array(N)`, N saves,
    /// `end_array`.
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.start_array(N)?;
        for item in self {
            item.encode(out)?;
        }
        out.end_array()
    }
}

impl<T: Decode + Copy + Default, const N: usize> Decode for [T; N] {
    /// `start_node`, size_tag must equal N else fail, N loads,
    /// `finish_node`.
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        if !inp.start_node()? {
            return Err(CodecError::structural("expected an array").into());
        }
        let len = inp.size_tag()?;
        if len != N {
            inp.finish_node(false)?;
            return Err(CodecError::size_mismatch(N, len).into());
        }
        let mut out = [T::default(); N];
        for slot in out.iter_mut() {
            *slot = T::decode(inp)?;
        }
        inp.finish_node(true)?;
        Ok(out)
    }
}

/// Set-like: same framing as sequence; insert instead of append / insert
/// into an initially empty container.
macro_rules! impl_set_like {
    ($ty:ident $(, $bound:path)?) => {
        impl<T: Encode + Eq + std::hash::Hash $(+ $bound)?> Encode for $ty<T> {
            fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
                out.start_array(self.len())?;
                for item in self {
                    item.encode(out)?;
                }
                out.end_array()
            }
        }

        impl<T: Decode + Eq + std::hash::Hash $(+ $bound)?> Decode for $ty<T> {
            fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
                if !inp.start_node()? {
                    return Err(CodecError::structural("expected an array").into());
                }
                let len = inp.size_tag()?;
                let mut out = $ty::with_capacity(len.min(1 << 16));
                for _ in 0..len {
                    out.insert(T::decode(inp)?);
                }
                inp.finish_node(true)?;
                Ok(out)
            }
        }
    };
}

impl_set_like!(HashSet);

impl<T: Encode + Ord> Encode for BTreeSet<T> {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.start_array(self.len())?;
        for item in self {
            item.encode(out)?;
        }
        out.end_array()
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        if !inp.start_node()? {
            return Err(CodecError::structural("expected an array").into());
        }
        let len = inp.size_tag()?;
        let mut out = BTreeSet::new();
        for _ in 0..len {
            out.insert(T::decode(inp)?);
        }
        inp.finish_node(true)?;
        Ok(out)
    }
}

/// Associative with a string key (§4.3 table): `start_object`, one keyed
/// entry per pair, `end_object` / `start_node`, for each key in the
/// object bind value.
impl<V: Encode> Encode for HashMap<String, V> {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.start_object(self.len())?;
        for (k, v) in self {
            out.map_entry(k, &mut |o| v.encode(o))?;
        }
        out.end_object()
    }
}

impl<V: Decode> Decode for HashMap<String, V> {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        if !inp.start_node()? {
            return Err(CodecError::structural("expected an object").into());
        }
        let mut out = HashMap::new();
        let len = inp.size_tag()?;
        for _ in 0..len {
            let key = inp.next_map_key()?;
            let value = V::decode(inp)?;
            out.insert(key, value);
        }
        inp.finish_node(true)?;
        Ok(out)
    }
}

impl<V: Encode> Encode for BTreeMap<String, V> {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.start_object(self.len())?;
        for (k, v) in self {
            out.map_entry(k, &mut |o| v.encode(o))?;
        }
        out.end_object()
    }
}

impl<V: Decode> Decode for BTreeMap<String, V> {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        if !inp.start_node()? {
            return Err(CodecError::structural("expected an object").into());
        }
        let mut out = BTreeMap::new();
        let len = inp.size_tag()?;
        for _ in 0..len {
            let key = inp.next_map_key()?;
            let value = V::decode(inp)?;
            out.insert(key, value);
        }
        inp.finish_node(true)?;
        Ok(out)
    }
}

/// Associative with a non-string key (§4.3 table): `start_array` of
/// `{key, value}` objects / reciprocal on load.
///
/// Rust's `HashMap<String, V>` already has the string-keyed impl above;
/// giving `HashMap<K, V>` a second, overlapping impl for non-string `K`
/// would need specialization, which isn't stable. Callers with a
/// non-string-keyed map use this explicit newtype instead — it is the
/// direct analogue of the C++ original's "is the key a string" compile-time
/// branch, just expressed as a type the caller opts into rather than an
/// automatic dispatch.
pub struct AssocArray<K, V>(pub Vec<(K, V)>);

impl<K, V> From<HashMap<K, V>> for AssocArray<K, V> {
    fn from(map: HashMap<K, V>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl<K: Eq + Hash, V> From<AssocArray<K, V>> for HashMap<K, V> {
    fn from(arr: AssocArray<K, V>) -> Self {
        arr.0.into_iter().collect()
    }
}

impl<K: Encode, V: Encode> Encode for AssocArray<K, V> {
    fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
        out.start_array(self.0.len())?;
        for (k, v) in &self.0 {
            out.start_object(2)?;
            out.name_value_pair("key", &mut |o| k.encode(o))?;
            out.name_value_pair("value", &mut |o| v.encode(o))?;
            out.end_object()?;
        }
        out.end_array()
    }
}

impl<K: Decode, V: Decode> Decode for AssocArray<K, V> {
    fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
        if !inp.start_node()? {
            return Err(CodecError::structural("expected an array").into());
        }
        let len = inp.size_tag()?;
        let mut out = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len {
            if !inp.start_node()? {
                return Err(CodecError::structural("expected {key, value} object").into());
            }
            if !inp.probe_name("key")? {
                return Err(CodecError::missing_field("key").into());
            }
            let key = K::decode(inp)?;
            if !inp.probe_name("value")? {
                return Err(CodecError::missing_field("value").into());
            }
            let value = V::decode(inp)?;
            inp.finish_node(true)?;
            out.push((key, value));
        }
        inp.finish_node(true)?;
        Ok(Self(out))
    }
}

macro_rules! impl_tuple {
    ($len:expr; $($idx:tt => $T:ident),+) => {
        impl<$($T: Encode),+> Encode for ($($T,)+) {
            /// Tuple (§4.3 table): `start_array(N)`, one save per
            /// component, `end_array`.
            fn encode<O: Output>(&self, out: &mut O) -> Result<(), O::Error> {
                out.start_array($len)?;
                $( self.$idx.encode(out)?; )+
                out.end_array()
            }
        }

        impl<$($T: Decode),+> Decode for ($($T,)+) {
            /// `start_node`, size must equal N, one load per component,
            /// `finish_node`.
            fn decode<I: Input>(inp: &mut I) -> Result<Self, I::Error> {
                if !inp.start_node()? {
                    return Err(CodecError::structural("expected an array").into());
                }
                let len = inp.size_tag()?;
                if len != $len {
                    inp.finish_node(false)?;
                    return Err(CodecError::size_mismatch($len, len).into());
                }
                let out = ( $( $T::decode(inp)?, )+ );
                inp.finish_node(true)?;
                Ok(out)
            }
        }
    };
}

impl_tuple!(1; 0 => A);
impl_tuple!(2; 0 => A, 1 => B);
impl_tuple!(3; 0 => A, 1 => B, 2 => C);
impl_tuple!(4; 0 => A, 1 => B, 2 => C, 3 => D);
impl_tuple!(5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_tuple!(6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
