use serde_json::{Map, Number, Value};

use neko_core::{CodecError, Output};

use crate::error::JsonError;
use crate::options::{Indent, JsonOptions};

enum Container {
    Array(Vec<Value>),
    /// The pending key is set by `name_value_pair` just before it invokes
    /// the caller's `write_value` closure, and consumed by the next
    /// `push_value` that closure triggers (possibly several frames deeper,
    /// if the value itself is a composite).
    Object(Map<String, Value>, Option<String>),
}

/// The JSON backend's writer (§4.4). Builds a `serde_json::Value` tree as
/// the record is traversed, then renders it in [`JsonWriter::finish`]
/// according to [`JsonOptions`] — the formatting knobs the spec requires
/// (indent char/width, single-line-array toggle, precision, compact mode)
/// don't map onto `serde_json`'s own `to_string`/`to_string_pretty`, so
/// finishing is a small hand-rolled printer over the tree instead.
pub struct JsonWriter {
    stack: Vec<Container>,
    root: Option<Value>,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Render the tree built so far and consume the writer. Errors if a
    /// composite was started but never closed.
    pub fn finish(mut self, options: &JsonOptions) -> Result<String, JsonError> {
        if !self.stack.is_empty() {
            return Err(CodecError::framing("finish called with an open composite").into());
        }
        let value = self
            .root
            .take()
            .ok_or_else(|| CodecError::structural("nothing was written"))?;
        let mut out = String::new();
        write_value(&value, options, 0, &mut out);
        Ok(out)
    }

    fn push_value(&mut self, v: Value) -> Result<(), JsonError> {
        match self.stack.last_mut() {
            Some(Container::Array(items)) => {
                items.push(v);
                Ok(())
            }
            Some(Container::Object(map, pending)) => {
                let key = pending.take().ok_or_else(|| {
                    CodecError::framing("value written outside a name_value_pair")
                })?;
                map.insert(key, v);
                Ok(())
            }
            None => {
                self.root = Some(v);
                Ok(())
            }
        }
    }
}

impl Output for JsonWriter {
    type Error = JsonError;

    fn save_bool(&mut self, v: bool) -> Result<(), Self::Error> {
        self.push_value(Value::Bool(v))
    }

    fn save_i64(&mut self, v: i64) -> Result<(), Self::Error> {
        self.push_value(Value::Number(Number::from(v)))
    }

    fn save_u64(&mut self, v: u64) -> Result<(), Self::Error> {
        self.push_value(Value::Number(Number::from(v)))
    }

    fn save_f64(&mut self, v: f64) -> Result<(), Self::Error> {
        let n = Number::from_f64(v)
            .ok_or_else(|| CodecError::schema(format!("{v} is not a finite JSON number")))?;
        self.push_value(Value::Number(n))
    }

    fn save_str(&mut self, v: &str) -> Result<(), Self::Error> {
        self.push_value(Value::String(v.to_string()))
    }

    fn save_null(&mut self) -> Result<(), Self::Error> {
        self.push_value(Value::Null)
    }

    fn save_raw(&mut self, text: &str) -> Result<(), Self::Error> {
        #[cfg(debug_assertions)]
        {
            if !braces_balanced(text) {
                return Err(JsonError::Token {
                    message: "raw_string field is not brace-balanced JSON".to_string(),
                    offset: 0,
                });
            }
        }
        let v: Value = serde_json::from_str(text)?;
        self.push_value(v)
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

    fn start_object(&mut self, _n: usize) -> Result<(), Self::Error> {
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        self.stack.push(Container::Object(Map::new(), None));
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Self::Error> {
        match self.stack.pop() {
            Some(Container::Object(map, _)) => self.push_value(Value::Object(map)),
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
        // The length is already implied by start_array/start_object's `n`
        // and by the closing token; JSON needs no separate size marker.
        Ok(())
    }
}

#[cfg(debug_assertions)]
fn braces_balanced(text: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0 && !in_string
}

fn push_indent(out: &mut String, indent: &Indent, depth: usize) {
    for _ in 0..indent.width * depth {
        out.push(indent.ch);
    }
}

fn write_value(v: &Value, options: &JsonOptions, depth: usize, out: &mut String) {
    match v {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, options, out),
        Value::String(s) => out.push_str(&serde_json::to_string(s).unwrap_or_default()),
        Value::Array(items) => write_array(items, options, depth, out),
        Value::Object(map) => write_object(map, options, depth, out),
    }
}

fn write_number(n: &Number, options: &JsonOptions, out: &mut String) {
    if let (Some(precision), true) = (options.precision, n.is_f64()) {
        if let Some(f) = n.as_f64() {
            out.push_str(&format!("{f:.precision$}"));
            return;
        }
    }
    out.push_str(&n.to_string());
}

fn write_array(items: &[Value], options: &JsonOptions, depth: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    let inline = options.indent.is_none() || options.single_line_arrays;
    out.push('[');
    if inline {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
                if options.indent.is_some() {
                    out.push(' ');
                }
            }
            write_value(item, options, depth, out);
        }
    } else {
        let indent = options.indent.as_ref().unwrap();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('\n');
            push_indent(out, indent, depth + 1);
            write_value(item, options, depth + 1, out);
        }
        out.push('\n');
        push_indent(out, indent, depth);
    }
    out.push(']');
}

fn write_object(map: &Map<String, Value>, options: &JsonOptions, depth: usize, out: &mut String) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    match &options.indent {
        None => {
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(k).unwrap_or_default());
                out.push(':');
                write_value(v, options, depth, out);
            }
        }
        Some(indent) => {
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                push_indent(out, indent, depth + 1);
                out.push_str(&serde_json::to_string(k).unwrap_or_default());
                out.push_str(": ");
                write_value(v, options, depth + 1, out);
            }
            out.push('\n');
            push_indent(out, indent, depth);
        }
    }
    out.push('}');
}
