/// A read-only reference to one field of a reflected record, paired with
/// its declared name and tag set.
pub struct FieldRef<'a> {
    pub name: &'static str,
    pub tags: crate::TagSet,
    pub value: &'a dyn std::any::Any,
}

/// The mutable counterpart of [`FieldRef`], used during deserialization and
/// by [`neko-reflection`](https://docs.rs/neko-reflection)'s `set_field`/
/// `bind_field`.
pub struct FieldRefMut<'a> {
    pub name: &'static str,
    pub tags: crate::TagSet,
    pub value: &'a mut dyn std::any::Any,
}

/// Field Description (§4.1): the sole source of truth about a record
/// type's layout. Every other component — JSON/binary/print codecs, the
/// reflection backend, the protocol registry's field lookups, the RPC
/// engine's "automatic expansion" of a single record parameter — derives
/// from this trait instead of re-deriving field lists of its own.
///
/// Implementations are generated by `#[derive(Reflect)]` (the macro form
/// of §4.1); nothing in this crate hand-implements it for a user type.
/// `Reflect` never copies field values: every accessor returns a
/// reference, and traversal order is always declaration order.
pub trait Reflect: Sized {
    /// Number of fields, fixed at compile time.
    const FIELD_COUNT: usize;

    /// Field names in declaration order. Always has length
    /// `Self::FIELD_COUNT` for a type produced by `#[derive(Reflect)]`;
    /// see the crate docs for why Rust's derive macro means the
    /// "structural form" fallback of §4.1 (no metadata, no names) never
    /// applies here the way it would in a reflection-poor language.
    const FIELD_NAMES: &'static [&'static str];

    /// Visit each field, in declaration order, yielding a type-erased
    /// reference plus its name and tags. Used by the print and
    /// reflection backends and by `flatten` handling.
    fn for_each_field<'a>(&'a self, f: &mut dyn FnMut(FieldRef<'a>));

    /// Mutable counterpart, used by the reflection backend's
    /// `set_field`/`bind_field` and by deserializers that build the
    /// value in place.
    fn for_each_field_mut<'a>(&'a mut self, f: &mut dyn FnMut(FieldRefMut<'a>));

    /// The wire name used by the protocol registry (§4.8) and JSON-RPC's
    /// "automatic expansion" (§4.9). Declared explicitly by the derive
    /// macro's `#[neko(name = "...")]` attribute, or defaults to the
    /// Rust type name — the spec's Design Notes require an explicit wire
    /// name rather than falling back to mangled `typeid` strings.
    fn type_name() -> &'static str;
}
