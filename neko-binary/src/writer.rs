use neko_core::{CodecError, Output};

use crate::error::BinaryError;

/// `save_null`'s wire representation: a single sentinel byte rather than
/// zero bytes. Zero bytes would make every `load_null` trial in a
/// tagless sum-type decode succeed unconditionally regardless of what
/// actually followed — giving a unit variant listed before a data
/// variant first-mover advantage it isn't supposed to have. One
/// distinguishing byte doesn't make the format self-describing, but it
/// keeps the common case (a unit variant whose payload doesn't happen to
/// start with this byte) honest.
pub(crate) const NULL_SENTINEL: u8 = 0xFF;

enum Frame {
    /// `start_array`/`start_fixed_array`: the length (if any) is already
    /// written, so elements append straight through to whatever the
    /// enclosing target buffer is.
    Array,
    /// `start_object`: the field count isn't known until `end_object`,
    /// because a `flatten`-tagged field can expand into more than one
    /// `name_value_pair` call. Buffered so the true count can be
    /// prefixed once it's known.
    Object { buf: Vec<u8>, count: usize },
}

/// The binary backend's writer (§4.5): length-prefixed, in-order, no
/// self-description. Field names passed to `name_value_pair` are never
/// written — the wire is pure positional data, decoded back in the same
/// declaration order the record type describes.
pub struct BinaryWriter {
    root: Vec<u8>,
    stack: Vec<Frame>,
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Consume the writer and return the encoded bytes. Errors if a
    /// composite was opened but never closed.
    pub fn finish(self) -> Result<Vec<u8>, BinaryError> {
        if !self.stack.is_empty() {
            return Err(CodecError::framing("finish called with an open composite").into());
        }
        Ok(self.root)
    }

    fn target(&mut self) -> &mut Vec<u8> {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Object { buf, .. } = frame {
                return buf;
            }
        }
        &mut self.root
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.target().extend_from_slice(bytes);
    }
}

impl Output for BinaryWriter {
    type Error = BinaryError;

    fn save_bool(&mut self, v: bool) -> Result<(), Self::Error> {
        self.push_bytes(&[v as u8]);
        Ok(())
    }

    fn save_i64(&mut self, v: i64) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_u64(&mut self, v: u64) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_i8(&mut self, v: i8) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_i16(&mut self, v: i16) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_i32(&mut self, v: i32) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_u8(&mut self, v: u8) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_u16(&mut self, v: u16) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_u32(&mut self, v: u32) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_be_bytes());
        Ok(())
    }

    fn save_f64(&mut self, v: f64) -> Result<(), Self::Error> {
        self.push_bytes(&v.to_bits().to_be_bytes());
        Ok(())
    }

    fn save_str(&mut self, v: &str) -> Result<(), Self::Error> {
        let len = u32::try_from(v.len())
            .map_err(|_| CodecError::schema("string too long for a 32-bit length prefix"))?;
        self.push_bytes(&len.to_be_bytes());
        self.push_bytes(v.as_bytes());
        Ok(())
    }

    fn save_null(&mut self) -> Result<(), Self::Error> {
        self.push_bytes(&[NULL_SENTINEL]);
        Ok(())
    }

    fn save_raw(&mut self, text: &str) -> Result<(), Self::Error> {
        // Binary has no textual grammar of its own, so a `raw_string`
        // field is indistinguishable from an ordinary length-prefixed
        // string once it's on the wire.
        self.save_str(text)
    }

    fn save_presence(&mut self, present: bool) -> Result<(), Self::Error> {
        self.push_bytes(&[present as u8]);
        Ok(())
    }

    fn start_array(&mut self, n: usize) -> Result<(), Self::Error> {
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        let len = u32::try_from(n)
            .map_err(|_| CodecError::schema("array too long for a 32-bit length prefix"))?;
        self.push_bytes(&len.to_be_bytes());
        self.stack.push(Frame::Array);
        Ok(())
    }

    fn start_fixed_array(&mut self, _n: usize) -> Result<(), Self::Error> {
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        self.stack.push(Frame::Array);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Self::Error> {
        match self.stack.pop() {
            Some(Frame::Array) => Ok(()),
            Some(other) => {
                self.stack.push(other);
                Err(CodecError::framing("end_array without matching start_array").into())
            }
            None => Err(CodecError::framing("end_array without matching start_array").into()),
        }
    }

    fn start_object(&mut self, _n: usize) -> Result<(), Self::Error> {
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        self.stack.push(Frame::Object {
            buf: Vec::new(),
            count: 0,
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Self::Error> {
        match self.stack.pop() {
            Some(Frame::Object { buf, count }) => {
                let len = u32::try_from(count)
                    .map_err(|_| CodecError::schema("too many fields for a 32-bit count"))?;
                self.push_bytes(&len.to_be_bytes());
                self.push_bytes(&buf);
                Ok(())
            }
            Some(other) => {
                self.stack.push(other);
                Err(CodecError::framing("end_object without matching start_object").into())
            }
            None => Err(CodecError::framing("end_object without matching start_object").into()),
        }
    }

    fn name_value_pair(
        &mut self,
        _name: &str,
        write_value: &mut dyn FnMut(&mut Self) -> Result<(), Self::Error>,
    ) -> Result<(), Self::Error> {
        match self.stack.last_mut() {
            Some(Frame::Object { count, .. }) => *count += 1,
            _ => return Err(CodecError::framing("name_value_pair outside an object").into()),
        }
        write_value(self)
    }

    /// Unlike `name_value_pair`, whose `name` is a static field name and
    /// is dropped, a map's `key` is data: it is written as an ordinary
    /// length-prefixed string immediately ahead of the value, so
    /// `Input::next_map_key` can read it back.
    fn map_entry(
        &mut self,
        key: &str,
        write_value: &mut dyn FnMut(&mut Self) -> Result<(), Self::Error>,
    ) -> Result<(), Self::Error> {
        match self.stack.last_mut() {
            Some(Frame::Object { count, .. }) => *count += 1,
            _ => return Err(CodecError::framing("map_entry outside an object").into()),
        }
        self.save_str(key)?;
        write_value(self)
    }

    fn size_tag(&mut self, _n: usize) -> Result<(), Self::Error> {
        // Arrays write their length eagerly in `start_array`; objects
        // defer it to `end_object`. Either way there's nothing left for
        // this call to do.
        Ok(())
    }

    fn supports_key_omission(&self) -> bool {
        false
    }
}
