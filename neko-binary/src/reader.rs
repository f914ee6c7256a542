use neko_core::{CodecError, Input, NodeKind};

use crate::error::BinaryError;
use crate::writer::NULL_SENTINEL;

/// One open composite: `total` elements (read from the length prefix, or
/// asserted statically for a `fixed_length` array), `consumed` of which
/// have been handed out via `probe_name`/the element loop so far.
struct Frame {
    total: usize,
    consumed: usize,
}

/// The binary backend's reader (§4.5), a cursor over a borrowed byte
/// slice. There is only one reader implementation — unlike JSON, binary
/// has no eager-vs-streaming distinction to make, since every read is
/// already just "take the next N bytes".
pub struct BinaryReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    stack: Vec<Frame>,
}

impl<'a> BinaryReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            stack: Vec::new(),
        }
    }

    /// Bytes left unconsumed. A caller decoding a single top-level value
    /// expects this to be `0` once `decode` returns.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], BinaryError> {
        if self.remaining() < n {
            return Err(BinaryError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], BinaryError> {
        Ok(self.take(N)?.try_into().expect("take(N) returns N bytes"))
    }

    fn read_u32(&mut self) -> Result<u32, BinaryError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    /// Register that one more element of the innermost open composite has
    /// been consumed, if there is one (the top-level value being decoded
    /// has no enclosing frame).
    fn note_consumed(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.consumed += 1;
        }
    }
}

impl<'a> Input for BinaryReader<'a> {
    type Error = BinaryError;

    fn load_bool(&mut self) -> Result<bool, Self::Error> {
        let v = self.take(1)?[0] != 0;
        self.note_consumed();
        Ok(v)
    }

    fn load_i64(&mut self) -> Result<i64, Self::Error> {
        let v = i64::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(v)
    }

    fn load_u64(&mut self) -> Result<u64, Self::Error> {
        let v = u64::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(v)
    }

    fn load_i8(&mut self) -> Result<i8, Self::Error> {
        let v = i8::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(v)
    }

    fn load_i16(&mut self) -> Result<i16, Self::Error> {
        let v = i16::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(v)
    }

    fn load_i32(&mut self) -> Result<i32, Self::Error> {
        let v = i32::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(v)
    }

    fn load_u8(&mut self) -> Result<u8, Self::Error> {
        let v = self.take(1)?[0];
        self.note_consumed();
        Ok(v)
    }

    fn load_u16(&mut self) -> Result<u16, Self::Error> {
        let v = u16::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(v)
    }

    fn load_u32(&mut self) -> Result<u32, Self::Error> {
        let v = u32::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(v)
    }

    fn load_f64(&mut self) -> Result<f64, Self::Error> {
        let bits = u64::from_be_bytes(self.take_array()?);
        self.note_consumed();
        Ok(f64::from_bits(bits))
    }

    fn load_string(&mut self) -> Result<String, Self::Error> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        let s = std::str::from_utf8(bytes)
            .map_err(|_| BinaryError::InvalidUtf8)?
            .to_string();
        self.note_consumed();
        Ok(s)
    }

    fn load_null(&mut self) -> Result<(), Self::Error> {
        if self.remaining() < 1 || self.bytes[self.pos] != NULL_SENTINEL {
            return Err(CodecError::structural("expected the null sentinel byte").into());
        }
        self.pos += 1;
        self.note_consumed();
        Ok(())
    }

    fn peek_kind(&mut self) -> Result<NodeKind, Self::Error> {
        // Binary carries no type tag on the wire; the static type the
        // caller is about to decode already determines what's next.
        // `Option<T>` and sum-type decode go through `load_presence`/
        // `start_node` instead of this for that reason. Kept only for
        // trait-completeness.
        Ok(NodeKind::Scalar)
    }

    fn load_presence(&mut self) -> Result<bool, Self::Error> {
        let v = self.take(1)?[0] != 0;
        self.note_consumed();
        Ok(v)
    }

    fn start_node(&mut self) -> Result<bool, Self::Error> {
        let len = self.read_u32()? as usize;
        self.stack.push(Frame {
            total: len,
            consumed: 0,
        });
        Ok(true)
    }

    fn start_fixed_node(&mut self, n: usize) -> Result<bool, Self::Error> {
        self.stack.push(Frame {
            total: n,
            consumed: 0,
        });
        Ok(true)
    }

    fn finish_node(&mut self, _success: bool) -> Result<(), Self::Error> {
        self.stack
            .pop()
            .ok_or_else(|| CodecError::framing("finish_node without matching start_node"))?;
        self.note_consumed();
        Ok(())
    }

    fn size_tag(&mut self) -> Result<usize, Self::Error> {
        self.stack
            .last()
            .map(|f| f.total)
            .ok_or_else(|| CodecError::framing("size_tag outside an open composite").into())
    }

    fn probe_name(&mut self, _name: &str) -> Result<bool, Self::Error> {
        let frame = self
            .stack
            .last()
            .ok_or_else(|| CodecError::framing("probe_name outside an open composite"))?;
        Ok(frame.consumed < frame.total)
    }

    /// A map's key was written as an ordinary length-prefixed string
    /// immediately ahead of its value (see `BinaryWriter::map_entry`), so
    /// reading it back is exactly `load_string`.
    fn next_map_key(&mut self) -> Result<String, Self::Error> {
        self.load_string()
    }

    fn skip_value(&mut self) -> Result<(), Self::Error> {
        // Binary has no self-description to skip by key, only by
        // position; every field the derive macro knows about is always
        // consumed in order, so this is never reached in practice.
        Err(CodecError::structural("skip_value is not supported by the binary backend").into())
    }
}
