/// One annotation in a field's [`TagSet`] (§3, §4.1). Tags are attached at
/// the `#[neko(...)]` attribute on a field and compiled into a `TagSet`
/// constant by `neko-derive`; there is no runtime representation beyond
/// this small bitset-like struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    /// The deserializer may omit this field without error if the target
    /// type supports emptiness (`Option<T>`, or a sum type with an empty
    /// variant). Requires `Skippable` to only be combined with such a
    /// type; `neko-derive` rejects the combination at compile time
    /// otherwise.
    Skippable,
    /// Encode this sub-record's fields as if they were members of the
    /// enclosing object; its own `start_object`/`end_object` are elided.
    Flatten,
    /// The binary backend emits this primitive at its native width with
    /// no length prefix, instead of the default length-prefixed framing.
    FixedLength,
    /// This string field is already well-formed JSON text and is written
    /// through verbatim rather than quoted/escaped; debug builds verify
    /// brace-balance before writing it.
    RawString,
}

/// The immutable set of tags attached to one field. Small and `Copy`:
/// in practice a field carries 0–2 tags, so a fixed-capacity array beats
/// a bitset or a `Vec` for both compile-time constness and a field-count
/// ceiling that will never be hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagSet {
    tags: [Option<FieldTag>; 4],
}

impl TagSet {
    pub const fn none() -> Self {
        Self { tags: [None; 4] }
    }

    pub const fn new(tags: &[FieldTag]) -> Self {
        let mut out = [None; 4];
        let mut i = 0;
        while i < tags.len() && i < 4 {
            out[i] = Some(tags[i]);
            i += 1;
        }
        Self { tags: out }
    }

    pub fn has(&self, tag: FieldTag) -> bool {
        self.tags.iter().any(|t| *t == Some(tag))
    }

    pub fn skippable(&self) -> bool {
        self.has(FieldTag::Skippable)
    }

    pub fn flatten(&self) -> bool {
        self.has(FieldTag::Flatten)
    }

    pub fn fixed_length(&self) -> bool {
        self.has(FieldTag::FixedLength)
    }

    pub fn raw_string(&self) -> bool {
        self.has(FieldTag::RawString)
    }
}
