/// What kind of node the input cursor is currently sitting on, returned by
/// `Input::peek_kind` (§4.2 "`is_array()` / `is_object()` — peek the
/// current node type without advancing").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Array,
    Object,
    Scalar,
    Null,
}

/// The output half of the Serializer Protocol (§4.2). A concrete backend
/// (JSON writer, binary writer, print writer) implements this once; every
/// type codec in [`crate::codec`] is written generically against it.
///
/// Contract: a save call either writes all required bytes for the datum
/// and returns `Ok`, or writes nothing of the failed datum and returns
/// `Err`. Composites opened with `start_array`/`start_object` must be
/// closed exactly once; closing one that was left in a failed state still
/// emits the format-required closer (e.g. the JSON backend still writes
/// `]`) and returns an error so the caller knows the composite was
/// incomplete.
pub trait Output {
    /// Every backend error must be constructible from a generic
    /// [`crate::CodecError`] so the container/primitive codecs in
    /// [`crate::codec`] can report schema/structural failures (narrowing
    /// conversions, size mismatches, unbalanced braces) without knowing
    /// the backend's concrete error type.
    type Error: std::error::Error + From<crate::CodecError> + 'static;

    fn save_bool(&mut self, v: bool) -> Result<(), Self::Error>;
    fn save_i64(&mut self, v: i64) -> Result<(), Self::Error>;
    fn save_u64(&mut self, v: u64) -> Result<(), Self::Error>;
    fn save_f64(&mut self, v: f64) -> Result<(), Self::Error>;
    fn save_str(&mut self, v: &str) -> Result<(), Self::Error>;
    fn save_null(&mut self) -> Result<(), Self::Error>;

    /// Narrower integer widths (§3: "the binary encoder uses the host-width
    /// primitive"). A format that represents every integer the same way
    /// regardless of width (JSON's `Number`) never needs to override
    /// these; they default to widening into the 64-bit call. A
    /// width-sensitive format (binary) overrides them to write exactly
    /// `size_of::<iN>()` bytes instead of always spending eight.
    fn save_i8(&mut self, v: i8) -> Result<(), Self::Error> {
        self.save_i64(i64::from(v))
    }
    fn save_i16(&mut self, v: i16) -> Result<(), Self::Error> {
        self.save_i64(i64::from(v))
    }
    fn save_i32(&mut self, v: i32) -> Result<(), Self::Error> {
        self.save_i64(i64::from(v))
    }
    fn save_u8(&mut self, v: u8) -> Result<(), Self::Error> {
        self.save_u64(u64::from(v))
    }
    fn save_u16(&mut self, v: u16) -> Result<(), Self::Error> {
        self.save_u64(u64::from(v))
    }
    fn save_u32(&mut self, v: u32) -> Result<(), Self::Error> {
        self.save_u64(u64::from(v))
    }

    /// Write `text` through verbatim, for `raw_string`-tagged fields.
    /// Debug builds of a JSON-producing backend verify brace-balance
    /// before writing; other backends may simply treat this like
    /// `save_str`.
    fn save_raw(&mut self, text: &str) -> Result<(), Self::Error>;

    /// `n` is advisory — backends that need a length prefix (binary) use
    /// it; backends that don't (JSON) ignore it.
    fn start_array(&mut self, n: usize) -> Result<(), Self::Error>;
    fn end_array(&mut self) -> Result<(), Self::Error>;

    /// Variant of [`Output::start_array`] for a sequence whose length is
    /// part of its *type* rather than its data: a `fixed_length`-tagged
    /// array field (§3 Tag System), a tuple, a fixed-size `[T; N]`, or an
    /// array-shape record's field list. Both ends already know `n`
    /// statically, so a backend that otherwise writes a length prefix
    /// (binary) omits it here. Defaults to [`Output::start_array`], which
    /// is already correct for any backend (JSON, print) that doesn't
    /// write a prefix in the first place.
    fn start_fixed_array(&mut self, n: usize) -> Result<(), Self::Error> {
        self.start_array(n)
    }

    fn start_object(&mut self, n: usize) -> Result<(), Self::Error>;
    fn end_object(&mut self) -> Result<(), Self::Error>;

    /// Variant of [`Output::start_object`] for a reflected record: its
    /// field count is part of the type, not runtime data, unlike a
    /// `HashMap`'s size. Defaults to [`Output::start_object`]; binary
    /// overrides it to skip the length prefix entirely, the same
    /// reasoning as [`Output::start_fixed_array`].
    fn start_fixed_object(&mut self, n: usize) -> Result<(), Self::Error> {
        self.start_object(n)
    }

    /// Emit a keyed entry in the enclosing object. `write_value` is
    /// invoked exactly once, in between the backend writing the key and
    /// any trailing separator it needs.
    fn name_value_pair(
        &mut self,
        name: &str,
        write_value: &mut dyn FnMut(&mut Self) -> Result<(), Self::Error>,
    ) -> Result<(), Self::Error>;

    /// Emit one entry of a string-keyed associative container (§4.3
    /// "associative with string key"). Unlike `name_value_pair`'s `name`
    /// (a field name known from the record's own type, which a positional
    /// backend may drop), `key` here is the map's *data* and must always
    /// round-trip. Defaults to `name_value_pair`, already correct for
    /// name-keyed backends (JSON, print); binary overrides this to write
    /// the key as an ordinary length-prefixed string instead of dropping
    /// it the way it drops record field names.
    fn map_entry(
        &mut self,
        key: &str,
        write_value: &mut dyn FnMut(&mut Self) -> Result<(), Self::Error>,
    ) -> Result<(), Self::Error> {
        self.name_value_pair(key, write_value)
    }

    /// Write a size, for formats that need one out-of-band from the
    /// composite framing itself. JSON's `start_array`/`start_object`
    /// already imply length via the closing token, so its impl is a
    /// no-op; binary's impl is also a no-op since the length prefix is
    /// already written by `start_array`/`start_object`. Kept distinct
    /// from those two for backends (e.g. a future columnar backend) that
    /// need the size written separately from the open token.
    fn size_tag(&mut self, n: usize) -> Result<(), Self::Error>;

    /// Presence marker for `Option<T>` (§4.3 "optional-like" row), written
    /// immediately before the contained value (if any). A self-describing
    /// backend (JSON, print) already has an unambiguous `null` token, so
    /// the default is a no-op when `present` and `save_null()` otherwise —
    /// exactly what these backends did before this method existed. A
    /// tagless backend (binary) has no token that can't also be a valid
    /// encoded value, so it overrides this to write an explicit
    /// discriminant, the same shape as the "optional-data" pattern used
    /// throughout XDR: a boolean flag ahead of the payload.
    fn save_presence(&mut self, present: bool) -> Result<(), Self::Error> {
        if present {
            Ok(())
        } else {
            self.save_null()
        }
    }

    /// Whether this backend can drop a `skippable`-tagged, empty optional
    /// field's `name_value_pair` entirely rather than writing it (§4.2:
    /// "skippable combined with an optional-like target resets the target
    /// to empty when the key is absent"). True for name-keyed backends
    /// (JSON), where a missing key is unambiguous. A positional,
    /// no-self-description backend (binary, §4.5) overrides this to
    /// `false`: dropping a slot would desynchronize every field that
    /// follows it on the wire, so it writes an explicit `null` in that
    /// slot instead of omitting it.
    fn supports_key_omission(&self) -> bool {
        true
    }
}

/// The input half of the Serializer Protocol (§4.2).
///
/// Contract: a load call that fails leaves the cursor at the failing
/// element so the caller may issue [`Input::rollback_item`] to re-read
/// (used by sum-type decoding, which tries alternatives in order). Every
/// `start_node` that returns `Ok(true)` must be paired with exactly one
/// `finish_node`; after `finish_node` the enclosing cursor advances past
/// the traversed composite iff the traversal itself reported success.
pub trait Input {
    type Error: std::error::Error + From<crate::CodecError> + 'static;

    fn load_bool(&mut self) -> Result<bool, Self::Error>;
    fn load_i64(&mut self) -> Result<i64, Self::Error>;
    fn load_u64(&mut self) -> Result<u64, Self::Error>;
    fn load_f64(&mut self) -> Result<f64, Self::Error>;
    fn load_string(&mut self) -> Result<String, Self::Error>;
    fn load_null(&mut self) -> Result<(), Self::Error>;

    /// Counterparts of [`Output::save_i8`]/[`Output::save_i16`]/
    /// [`Output::save_i32`] etc. Default behavior reads the 64-bit call
    /// and narrows, which is exactly what the plain `iN`/`uN` `Decode`
    /// impls did before these existed — the narrowing check (and its
    /// schema error on overflow) now lives here once instead of being
    /// duplicated per width in `codec::primitive`. A width-sensitive
    /// format (binary) overrides these to read exactly the matching
    /// number of bytes back.
    fn load_i8(&mut self) -> Result<i8, Self::Error> {
        let v = self.load_i64()?;
        i8::try_from(v).map_err(|_| crate::CodecError::schema(format!("{v} does not fit in i8")).into())
    }
    fn load_i16(&mut self) -> Result<i16, Self::Error> {
        let v = self.load_i64()?;
        i16::try_from(v).map_err(|_| crate::CodecError::schema(format!("{v} does not fit in i16")).into())
    }
    fn load_i32(&mut self) -> Result<i32, Self::Error> {
        let v = self.load_i64()?;
        i32::try_from(v).map_err(|_| crate::CodecError::schema(format!("{v} does not fit in i32")).into())
    }
    fn load_u8(&mut self) -> Result<u8, Self::Error> {
        let v = self.load_u64()?;
        u8::try_from(v).map_err(|_| crate::CodecError::schema(format!("{v} does not fit in u8")).into())
    }
    fn load_u16(&mut self) -> Result<u16, Self::Error> {
        let v = self.load_u64()?;
        u16::try_from(v).map_err(|_| crate::CodecError::schema(format!("{v} does not fit in u16")).into())
    }
    fn load_u32(&mut self) -> Result<u32, Self::Error> {
        let v = self.load_u64()?;
        u32::try_from(v).map_err(|_| crate::CodecError::schema(format!("{v} does not fit in u32")).into())
    }

    /// Read back a `raw_string`-tagged field: the pre-formed wire text of
    /// whatever value currently sits under the cursor (which may itself be
    /// an object or array, not a JSON string token). Backends for which a
    /// "raw" value is indistinguishable from an ordinary string (binary,
    /// print) can rely on the default, which just defers to
    /// `load_string`.
    fn load_raw(&mut self) -> Result<String, Self::Error> {
        self.load_string()
    }

    /// Peek the current node's shape without advancing.
    fn peek_kind(&mut self) -> Result<NodeKind, Self::Error>;

    /// Counterpart of [`Output::save_presence`]. Default peeks for a
    /// `null` token, consuming it and returning `false` if found, else
    /// leaving the cursor untouched and returning `true` (the value
    /// itself follows next, to be read by the caller). Binary overrides
    /// this to read its explicit presence discriminant instead of
    /// peeking a token that doesn't exist on its wire.
    fn load_presence(&mut self) -> Result<bool, Self::Error> {
        if matches!(self.peek_kind()?, NodeKind::Null) {
            self.load_null()?;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    /// Begin traversing a composite whose shape is determined at
    /// runtime. Returns `Ok(false)` (never advancing) if the current
    /// node isn't actually a composite, so sum-type decoding can try the
    /// next alternative without a `finish_node` call.
    fn start_node(&mut self) -> Result<bool, Self::Error>;

    /// Variant of [`Input::start_node`] for a `fixed_length`-tagged array
    /// field whose length `n` is already known statically: a binary
    /// reader skips reading a length prefix and simply asserts `n`
    /// elements follow. Defaults to [`Input::start_node`].
    fn start_fixed_node(&mut self, n: usize) -> Result<bool, Self::Error> {
        let _ = n;
        self.start_node()
    }

    /// End a traversal begun by a `start_node` that returned `Ok(true)`.
    /// `success` must reflect whether the traversal actually consumed a
    /// well-formed composite; on `false` the enclosing cursor does not
    /// advance, leaving the node available for another `start_node`
    /// attempt (sum-type / optional decoding).
    fn finish_node(&mut self, success: bool) -> Result<(), Self::Error>;

    /// Read the length of the current array/object composite without
    /// consuming it. For a fixed-length sequence or tuple the caller
    /// compares this against the statically known arity and fails the
    /// load if it doesn't match.
    fn size_tag(&mut self) -> Result<usize, Self::Error>;

    /// Order-independent probe of the current object for a member named
    /// `name`. On `Ok(true)` the cursor is positioned so the next load
    /// call reads that member's value; on `Ok(false)` the cursor is
    /// unchanged (the member is absent).
    fn probe_name(&mut self, name: &str) -> Result<bool, Self::Error>;

    /// Read the next entry of a string-keyed associative container (§4.3
    /// "associative with string key" on load): returns the entry's key and
    /// positions the cursor so the following `Decode::decode` call reads
    /// its value. Unlike `probe_name`, which resolves a schema-known name
    /// out of order, this walks the object's members in whatever order
    /// the backend holds them, one per call — the counterpart of
    /// `Output::map_entry`. Must be called exactly `size_tag()` times
    /// before the enclosing `finish_node`.
    fn next_map_key(&mut self) -> Result<String, Self::Error>;

    /// Advance past the current array element without consuming it into
    /// any particular load call site — used when a `flatten`ed record's
    /// codec needs to skip an object key it doesn't recognize.
    fn skip_value(&mut self) -> Result<(), Self::Error>;

    /// Re-read the element the last failed load call left the cursor on.
    /// Used by sum-type decoding: if alternative A's load fails, the
    /// cursor must still be positioned on the same element so
    /// alternative B can attempt it.
    fn rollback_item(&mut self) {}
}
