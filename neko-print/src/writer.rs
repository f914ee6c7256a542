use neko_core::{CodecError, Output};

use crate::error::PrintError;

/// Builder-tree node, mirroring the shape `neko_json::JsonWriter` uses
/// internally, but rendered unquoted and without the `:`-keyed object
/// syntax — `{ name = value, ... }` instead of `{"name":value,...}`.
enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    /// A `raw_string`-tagged field: pre-formed text, written through
    /// verbatim rather than quoted.
    Raw(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

enum Container {
    Array(Vec<Value>),
    Object(Vec<(String, Value)>, Option<String>),
}

/// The Print backend's (only) writer (§4.6). Builds a small value tree as
/// the record is traversed, then renders it with [`PrintWriter::finish`].
/// There is no reader half: round-tripping through Print is not supported.
pub struct PrintWriter {
    stack: Vec<Container>,
    root: Option<Value>,
}

impl Default for PrintWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintWriter {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Render the tree built so far and consume the writer. A composite
    /// left open (no matching `end_array`/`end_object`) renders as if it
    /// had been closed empty — this backend is diagnostic-only, so a
    /// caller who hits that case almost certainly has a bug elsewhere the
    /// rendered text will already look wrong enough to surface.
    pub fn finish(mut self) -> String {
        while let Some(open) = self.stack.pop() {
            let v = match open {
                Container::Array(items) => Value::Array(items),
                Container::Object(fields, _) => Value::Object(fields),
            };
            let _ = self.push_value(v);
        }
        let mut out = String::new();
        match self.root.take() {
            Some(v) => render(&v, &mut out),
            None => out.push_str("{ }"),
        }
        out
    }

    fn push_value(&mut self, v: Value) -> Result<(), PrintError> {
        match self.stack.last_mut() {
            Some(Container::Array(items)) => {
                items.push(v);
                Ok(())
            }
            Some(Container::Object(fields, pending)) => {
                let key = pending
                    .take()
                    .ok_or_else(|| CodecError::framing("value written outside a name_value_pair"))?;
                fields.push((key, v));
                Ok(())
            }
            None => {
                self.root = Some(v);
                Ok(())
            }
        }
    }
}

impl Output for PrintWriter {
    type Error = PrintError;

    fn save_bool(&mut self, v: bool) -> Result<(), Self::Error> {
        self.push_value(Value::Bool(v))
    }
    fn save_i64(&mut self, v: i64) -> Result<(), Self::Error> {
        self.push_value(Value::Int(v))
    }
    fn save_u64(&mut self, v: u64) -> Result<(), Self::Error> {
        self.push_value(Value::Uint(v))
    }
    fn save_f64(&mut self, v: f64) -> Result<(), Self::Error> {
        self.push_value(Value::Float(v))
    }
    fn save_str(&mut self, v: &str) -> Result<(), Self::Error> {
        self.push_value(Value::Str(v.to_string()))
    }
    fn save_null(&mut self) -> Result<(), Self::Error> {
        self.push_value(Value::Null)
    }
    fn save_raw(&mut self, text: &str) -> Result<(), Self::Error> {
        self.push_value(Value::Raw(text.to_string()))
    }

    fn start_array(&mut self, n: usize) -> Result<(), Self::Error> {
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        self.stack.push(Container::Array(Vec::with_capacity(n.min(1 << 16))));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Self::Error> {
        match self.stack.pop() {
            Some(Container::Array(items)) => self.push_value(Value::Array(items)),
            Some(other) => {
                self.stack.push(other);
                Err(CodecError::framing("end_array without matching start_array").into())
            }
            None => Err(CodecError::framing("end_array without matching start_array").into()),
        }
    }

    fn start_object(&mut self, n: usize) -> Result<(), Self::Error> {
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        self.stack.push(Container::Object(Vec::with_capacity(n), None));
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Self::Error> {
        match self.stack.pop() {
            Some(Container::Object(fields, _)) => self.push_value(Value::Object(fields)),
            Some(other) => {
                self.stack.push(other);
                Err(CodecError::framing("end_object without matching start_object").into())
            }
            None => Err(CodecError::framing("end_object without matching start_object").into()),
        }
    }

    fn name_value_pair(
        &mut self,
        name: &str,
        write_value: &mut dyn FnMut(&mut Self) -> Result<(), Self::Error>,
    ) -> Result<(), Self::Error> {
        match self.stack.last_mut() {
            Some(Container::Object(_, pending)) => *pending = Some(name.to_string()),
            _ => return Err(CodecError::framing("name_value_pair outside an object").into()),
        }
        write_value(self)
    }

    fn size_tag(&mut self, _n: usize) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn render(v: &Value, out: &mut String) {
    match v {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Uint(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&n.to_string()),
        Value::Str(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Raw(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render(item, out);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push_str("{ ");
            for (i, (name, value)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(" = ");
                render(value, out);
            }
            out.push_str(" }");
        }
    }
}
