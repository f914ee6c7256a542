use serde_json::{Map, Value};

use neko_core::{CodecError, Input, NodeKind};

use crate::error::JsonError;
use crate::options::JsonOptions;

enum Frame {
    Array { items: Vec<Value>, idx: usize },
    Object { map: Map<String, Value>, selected: Option<Value> },
}

/// Random-access JSON reader (§4.4's "DOM parser"): the whole input is
/// parsed into a `serde_json::Value` tree up front, and every
/// `start_node`/`probe_name` call is a tree lookup. Compare
/// [`crate::JsonStreamReader`], which defers parsing a node's contents
/// until it is actually entered.
///
/// Every read is peek-then-consume: a failing `load_*`/`start_node` call
/// never removes the value it looked at, so the default (no-op)
/// `Input::rollback_item` is already correct and this reader doesn't
/// override it.
pub struct JsonDomReader {
    stack: Vec<Frame>,
    root: Option<Value>,
    options: JsonOptions,
}

impl JsonDomReader {
    pub fn new(text: &str) -> Result<Self, JsonError> {
        Self::with_options(text, JsonOptions::default())
    }

    pub fn with_options(text: &str, options: JsonOptions) -> Result<Self, JsonError> {
        let root: Value = serde_json::from_str(text)?;
        Ok(Self {
            stack: Vec::new(),
            root: Some(root),
            options,
        })
    }

    fn peek_current(&self) -> Result<&Value, JsonError> {
        match self.stack.last() {
            Some(Frame::Array { items, idx }) => items
                .get(*idx)
                .ok_or_else(|| CodecError::structural("array exhausted").into()),
            Some(Frame::Object { selected, .. }) => selected
                .as_ref()
                .ok_or_else(|| CodecError::structural("no field selected; call probe_name first").into()),
            None => self
                .root
                .as_ref()
                .ok_or_else(|| CodecError::structural("document already consumed").into()),
        }
    }

    fn take_current(&mut self) -> Result<Value, JsonError> {
        match self.stack.last_mut() {
            Some(Frame::Array { items, idx }) => {
                let v = items
                    .get(*idx)
                    .cloned()
                    .ok_or_else(|| CodecError::structural("array exhausted"))?;
                *idx += 1;
                Ok(v)
            }
            Some(Frame::Object { selected, .. }) => selected
                .take()
                .ok_or_else(|| CodecError::structural("no field selected; call probe_name first").into()),
            None => self
                .root
                .take()
                .ok_or_else(|| CodecError::structural("document already consumed").into()),
        }
    }

    fn put_back(&mut self, v: Value) {
        match self.stack.last_mut() {
            Some(Frame::Array { idx, .. }) => {
                *idx -= 1;
                let _ = v;
            }
            Some(Frame::Object { selected, .. }) => *selected = Some(v),
            None => self.root = Some(v),
        }
    }

    fn is_none_string(&self, v: &Value) -> bool {
        self.options.none_as_null && matches!(v, Value::String(s) if s == "None")
    }
}

impl Input for JsonDomReader {
    type Error = JsonError;

    fn load_bool(&mut self) -> Result<bool, Self::Error> {
        match self.peek_current()? {
            Value::Bool(b) => {
                let b = *b;
                self.take_current()?;
                Ok(b)
            }
            other => Err(CodecError::schema(format!("expected bool, found {other}")).into()),
        }
    }

    fn load_i64(&mut self) -> Result<i64, Self::Error> {
        match self.peek_current()? {
            Value::Number(n) if n.as_i64().is_some() => {
                let v = n.as_i64().unwrap();
                self.take_current()?;
                Ok(v)
            }
            other => Err(CodecError::schema(format!("expected an integer, found {other}")).into()),
        }
    }

    fn load_u64(&mut self) -> Result<u64, Self::Error> {
        match self.peek_current()? {
            Value::Number(n) if n.as_u64().is_some() => {
                let v = n.as_u64().unwrap();
                self.take_current()?;
                Ok(v)
            }
            other => {
                Err(CodecError::schema(format!("expected an unsigned integer, found {other}")).into())
            }
        }
    }

    fn load_f64(&mut self) -> Result<f64, Self::Error> {
        match self.peek_current()? {
            Value::Number(n) if n.as_f64().is_some() => {
                let v = n.as_f64().unwrap();
                self.take_current()?;
                Ok(v)
            }
            other => Err(CodecError::schema(format!("expected a number, found {other}")).into()),
        }
    }

    fn load_string(&mut self) -> Result<String, Self::Error> {
        match self.peek_current()? {
            Value::String(_) => {
                let Value::String(s) = self.take_current()? else {
                    unreachable!()
                };
                Ok(s)
            }
            other => Err(CodecError::schema(format!("expected a string, found {other}")).into()),
        }
    }

    fn load_null(&mut self) -> Result<(), Self::Error> {
        let current = self.peek_current()?;
        if matches!(current, Value::Null) || self.is_none_string(current) {
            self.take_current()?;
            Ok(())
        } else {
            let found = current.clone();
            Err(CodecError::schema(format!("expected null, found {found}")).into())
        }
    }

    fn load_raw(&mut self) -> Result<String, Self::Error> {
        let v = self.take_current()?;
        Ok(serde_json::to_string(&v)?)
    }

    fn peek_kind(&mut self) -> Result<NodeKind, Self::Error> {
        let v = self.peek_current()?;
        Ok(if matches!(v, Value::Null) || self.is_none_string(v) {
            NodeKind::Null
        } else {
            match v {
                Value::Array(_) => NodeKind::Array,
                Value::Object(_) => NodeKind::Object,
                _ => NodeKind::Scalar,
            }
        })
    }

    fn start_node(&mut self) -> Result<bool, Self::Error> {
        if !matches!(self.peek_current()?, Value::Array(_) | Value::Object(_)) {
            return Ok(false);
        }
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        match self.take_current()? {
            Value::Array(items) => self.stack.push(Frame::Array { items, idx: 0 }),
            Value::Object(map) => self.stack.push(Frame::Object { map, selected: None }),
            _ => unreachable!("checked above"),
        }
        Ok(true)
    }

    fn finish_node(&mut self, success: bool) -> Result<(), Self::Error> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| CodecError::framing("finish_node without matching start_node"))?;
        if success {
            return Ok(());
        }
        let v = match frame {
            Frame::Array { items, .. } => Value::Array(items),
            Frame::Object { map, .. } => Value::Object(map),
        };
        self.put_back(v);
        Ok(())
    }

    fn size_tag(&mut self) -> Result<usize, Self::Error> {
        match self.stack.last() {
            Some(Frame::Array { items, .. }) => Ok(items.len()),
            Some(Frame::Object { map, .. }) => Ok(map.len()),
            None => Err(CodecError::framing("size_tag outside a composite").into()),
        }
    }

    fn probe_name(&mut self, name: &str) -> Result<bool, Self::Error> {
        match self.stack.last_mut() {
            Some(Frame::Object { map, selected }) => match map.get(name) {
                Some(v) => {
                    *selected = Some(v.clone());
                    Ok(true)
                }
                None => Ok(false),
            },
            _ => Err(CodecError::framing("probe_name outside an object").into()),
        }
    }

    fn next_map_key(&mut self) -> Result<String, Self::Error> {
        match self.stack.last_mut() {
            Some(Frame::Object { map, selected }) => {
                let key = map
                    .keys()
                    .next()
                    .cloned()
                    .ok_or_else(|| CodecError::structural("map exhausted"))?;
                let value = map.remove(&key).expect("key was just read from this map");
                *selected = Some(value);
                Ok(key)
            }
            _ => Err(CodecError::framing("next_map_key outside an object").into()),
        }
    }

    fn skip_value(&mut self) -> Result<(), Self::Error> {
        self.take_current().map(|_| ())
    }
}
