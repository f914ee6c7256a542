use std::any::Any;

use neko_core::{Decode, Encode, Reflect};
use neko_reflection::ReflectionTable;

use crate::error::ProtoError;

/// The wire format a registered record chooses as its protocol encoding
/// (§6.4: "choosing one serializer backend as its wire format"). `IProto`'s
/// type-erased `encode`/`decode` dispatch through this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Binary,
}

/// A record type opts into the Protocol Registry by implementing this
/// trait alongside `#[derive(Reflect)]` (§6.4). `wire_format` and
/// `specify_type` both have spec-mandated defaults — JSON, and "no
/// reservation, assign an id automatically" — so the common case is an
/// empty `impl Proto for MyRecord {}`.
pub trait Proto: Reflect + Encode + Decode + Default + Any {
    /// Wire format used by `IProto::encode`/`IProto::decode` for this
    /// type. Defaults to JSON, the self-describing format, since most
    /// protocols benefit from forward/backward tolerance of unknown or
    /// missing fields; a record that wants compact framing overrides this.
    fn wire_format() -> WireFormat {
        WireFormat::Json
    }

    /// A fixed type id below [`crate::RESERVED_BASE`] (§3: "a record may
    /// reserve a fixed id below `reserved_base` via an explicit
    /// declaration"). `None` (the default) means "assign one automatically
    /// by sorted name" at registry build time.
    fn specify_type() -> Option<u32> {
        None
    }
}

/// Per-type shims that let [`IProto`] encode/decode/reflect a type-erased
/// `dyn Any` without knowing its concrete type at the call site. One
/// instance is built, at registration time, per registered `T`.
pub(crate) struct ProtoVTable {
    pub encode: fn(&dyn Any) -> Result<Vec<u8>, ProtoError>,
    pub decode: fn(&[u8]) -> Result<Box<dyn Any>, ProtoError>,
    pub reflect: for<'a> fn(&'a dyn Any) -> ReflectionTable<'a>,
}

impl ProtoVTable {
    pub(crate) fn for_type<T: Proto>() -> &'static ProtoVTable {
        fn encode_shim<T: Proto>(any: &dyn Any) -> Result<Vec<u8>, ProtoError> {
            let record = any
                .downcast_ref::<T>()
                .expect("IProto's inner value always matches its own vtable's T");
            match T::wire_format() {
                WireFormat::Json => neko_json::to_string(record, &neko_json::JsonOptions::compact())
                    .map(String::into_bytes)
                    .map_err(|e| ProtoError::Encode(e.to_string())),
                WireFormat::Binary => {
                    neko_binary::to_bytes(record).map_err(|e| ProtoError::Encode(e.to_string()))
                }
            }
        }

        fn decode_shim<T: Proto>(bytes: &[u8]) -> Result<Box<dyn Any>, ProtoError> {
            let value: T = match T::wire_format() {
                WireFormat::Json => {
                    let text = std::str::from_utf8(bytes)
                        .map_err(|e| ProtoError::Decode(e.to_string()))?;
                    neko_json::from_str(text).map_err(|e| ProtoError::Decode(e.to_string()))?
                }
                WireFormat::Binary => {
                    neko_binary::from_bytes(bytes).map_err(|e| ProtoError::Decode(e.to_string()))?
                }
            };
            Ok(Box::new(value))
        }

        fn reflect_shim<T: Proto>(any: &dyn Any) -> ReflectionTable<'_> {
            let record = any
                .downcast_ref::<T>()
                .expect("IProto's inner value always matches its own vtable's T");
            ReflectionTable::capture(record)
        }

        // One vtable per `T`, built once and leaked: `IProto` stores a
        // `&'static` reference to it rather than cloning function
        // pointers into every handle.
        Box::leak(Box::new(ProtoVTable {
            encode: encode_shim::<T>,
            decode: decode_shim::<T>,
            reflect: reflect_shim::<T>,
        }))
    }
}

/// Type-erased record handle (§3 Data Model: `IProto`). Wraps one instance
/// of a registered record plus the vtable the registry built for its
/// concrete type, so callers that only know a type's wire name can still
/// encode/decode/reflect it.
pub struct IProto {
    name: &'static str,
    type_id: u32,
    inner: Box<dyn Any>,
    vtable: &'static ProtoVTable,
}

impl IProto {
    pub(crate) fn new<T: Proto>(value: T, name: &'static str, type_id: u32) -> Self {
        Self {
            name,
            type_id,
            inner: Box::new(value),
            vtable: ProtoVTable::for_type::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> u32 {
        self.type_id
    }

    /// Set the handle's recorded type id, called once by
    /// [`crate::ProtoFactory`] right after construction — the descriptor's
    /// own `construct` function pointer is built before the registry has
    /// assigned an id, so it bakes in a placeholder of `0`.
    pub(crate) fn set_type_id(&mut self, id: u32) {
        self.type_id = id;
    }

    /// Encode the wrapped record using its registered wire format.
    pub fn encode(&self) -> Result<Vec<u8>, ProtoError> {
        (self.vtable.encode)(self.inner.as_ref())
    }

    /// Decode `bytes` using the registered wire format and replace the
    /// wrapped record with the result (§3: "`decode(bytes) → ok|error`").
    pub fn decode(&mut self, bytes: &[u8]) -> Result<(), ProtoError> {
        self.inner = (self.vtable.decode)(bytes)?;
        Ok(())
    }

    /// Capture a [`ReflectionTable`] over the wrapped record (§3:
    /// "`reflection_object()`").
    pub fn reflection_object(&self) -> ReflectionTable<'_> {
        (self.vtable.reflect)(self.inner.as_ref())
    }

    /// Downcast back to the concrete type, for a caller that already
    /// knows it (mirrors the constructor-time type without needing a
    /// second registry lookup).
    pub fn downcast_ref<T: Proto>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}
