use std::collections::HashMap;

use serde_json::value::RawValue;

use neko_core::{CodecError, Input, NodeKind};

use crate::error::JsonError;
use crate::options::JsonOptions;

enum Frame {
    Array { items: Vec<Box<RawValue>>, idx: usize },
    Object { entries: HashMap<String, Box<RawValue>>, selected: Option<Box<RawValue>> },
}

/// Token-cursor JSON reader (§4.4's "streaming parser"): the constructor
/// only parses the input one level deep, into [`RawValue`]s, and each
/// `start_node` call parses only the node it just entered — unlike
/// [`crate::JsonDomReader`], nested content is never materialized until a
/// caller actually descends into it. A sibling value an arm never visits
/// (e.g. the loser of a sum-type decode) is never parsed at all.
pub struct JsonStreamReader {
    stack: Vec<Frame>,
    root: Option<Box<RawValue>>,
    options: JsonOptions,
}

impl JsonStreamReader {
    pub fn new(text: &str) -> Result<Self, JsonError> {
        Self::with_options(text, JsonOptions::default())
    }

    pub fn with_options(text: &str, options: JsonOptions) -> Result<Self, JsonError> {
        let root: Box<RawValue> = serde_json::from_str(text)?;
        Ok(Self {
            stack: Vec::new(),
            root: Some(root),
            options,
        })
    }

    fn peek_raw(&self) -> Result<&RawValue, JsonError> {
        match self.stack.last() {
            Some(Frame::Array { items, idx }) => items
                .get(*idx)
                .map(|b| b.as_ref())
                .ok_or_else(|| CodecError::structural("array exhausted").into()),
            Some(Frame::Object { selected, .. }) => selected
                .as_deref()
                .ok_or_else(|| CodecError::structural("no field selected; call probe_name first").into()),
            None => self
                .root
                .as_deref()
                .ok_or_else(|| CodecError::structural("document already consumed").into()),
        }
    }

    fn take_raw(&mut self) -> Result<Box<RawValue>, JsonError> {
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

    fn put_back(&mut self, v: Box<RawValue>) {
        match self.stack.last_mut() {
            Some(Frame::Array { idx, .. }) => {
                *idx -= 1;
                let _ = v;
            }
            Some(Frame::Object { selected, .. }) => *selected = Some(v),
            None => self.root = Some(v),
        }
    }

    fn sniff(text: &str) -> NodeKind {
        match text.trim_start().as_bytes().first() {
            Some(b'{') => NodeKind::Object,
            Some(b'[') => NodeKind::Array,
            Some(b'n') => NodeKind::Null,
            _ => NodeKind::Scalar,
        }
    }

    fn is_none_string(&self, text: &str) -> bool {
        self.options.none_as_null && text.trim() == "\"None\""
    }
}

impl Input for JsonStreamReader {
    type Error = JsonError;

    fn load_bool(&mut self) -> Result<bool, Self::Error> {
        let text = self.peek_raw()?.get();
        let v: bool = serde_json::from_str(text)
            .map_err(|_| CodecError::schema(format!("expected bool, found `{text}`")))?;
        self.take_raw()?;
        Ok(v)
    }

    fn load_i64(&mut self) -> Result<i64, Self::Error> {
        let text = self.peek_raw()?.get();
        let v: i64 = serde_json::from_str(text)
            .map_err(|_| CodecError::schema(format!("expected an integer, found `{text}`")))?;
        self.take_raw()?;
        Ok(v)
    }

    fn load_u64(&mut self) -> Result<u64, Self::Error> {
        let text = self.peek_raw()?.get();
        let v: u64 = serde_json::from_str(text).map_err(|_| {
            CodecError::schema(format!("expected an unsigned integer, found `{text}`"))
        })?;
        self.take_raw()?;
        Ok(v)
    }

    fn load_f64(&mut self) -> Result<f64, Self::Error> {
        let text = self.peek_raw()?.get();
        let v: f64 = serde_json::from_str(text)
            .map_err(|_| CodecError::schema(format!("expected a number, found `{text}`")))?;
        self.take_raw()?;
        Ok(v)
    }

    fn load_string(&mut self) -> Result<String, Self::Error> {
        let text = self.peek_raw()?.get();
        let v: String = serde_json::from_str(text)
            .map_err(|_| CodecError::schema(format!("expected a string, found `{text}`")))?;
        self.take_raw()?;
        Ok(v)
    }

    fn load_null(&mut self) -> Result<(), Self::Error> {
        let text = self.peek_raw()?.get();
        if text.trim() == "null" || self.is_none_string(text) {
            self.take_raw()?;
            Ok(())
        } else {
            Err(CodecError::schema(format!("expected null, found `{text}`")).into())
        }
    }

    fn load_raw(&mut self) -> Result<String, Self::Error> {
        Ok(self.take_raw()?.get().to_string())
    }

    fn peek_kind(&mut self) -> Result<NodeKind, Self::Error> {
        let text = self.peek_raw()?.get();
        Ok(if self.is_none_string(text) {
            NodeKind::Null
        } else {
            Self::sniff(text)
        })
    }

    fn start_node(&mut self) -> Result<bool, Self::Error> {
        let kind = Self::sniff(self.peek_raw()?.get());
        if !matches!(kind, NodeKind::Array | NodeKind::Object) {
            return Ok(false);
        }
        if self.stack.len() >= neko_core::MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded().into());
        }
        let raw = self.take_raw()?;
        match kind {
            NodeKind::Array => {
                let items: Vec<Box<RawValue>> = serde_json::from_str(raw.get())?;
                self.stack.push(Frame::Array { items, idx: 0 });
            }
            NodeKind::Object => {
                let entries: HashMap<String, Box<RawValue>> = serde_json::from_str(raw.get())?;
                self.stack.push(Frame::Object {
                    entries,
                    selected: None,
                });
            }
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
        let raw = match frame {
            Frame::Array { items, .. } => {
                let joined = items
                    .iter()
                    .map(|v| v.get())
                    .collect::<Vec<_>>()
                    .join(",");
                RawValue::from_string(format!("[{joined}]"))?
            }
            Frame::Object { entries, .. } => {
                let joined = entries
                    .iter()
                    .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap_or_default(), v.get()))
                    .collect::<Vec<_>>()
                    .join(",");
                RawValue::from_string(format!("{{{joined}}}"))?
            }
        };
        self.put_back(raw);
        Ok(())
    }

    fn size_tag(&mut self) -> Result<usize, Self::Error> {
        match self.stack.last() {
            Some(Frame::Array { items, .. }) => Ok(items.len()),
            Some(Frame::Object { entries, .. }) => Ok(entries.len()),
            None => Err(CodecError::framing("size_tag outside a composite").into()),
        }
    }

    fn probe_name(&mut self, name: &str) -> Result<bool, Self::Error> {
        match self.stack.last_mut() {
            Some(Frame::Object { entries, selected }) => match entries.get(name) {
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
            Some(Frame::Object { entries, selected }) => {
                let key = entries
                    .keys()
                    .next()
                    .cloned()
                    .ok_or_else(|| CodecError::structural("map exhausted"))?;
                let value = entries.remove(&key).expect("key was just read from this map");
                *selected = Some(value);
                Ok(key)
            }
            _ => Err(CodecError::framing("next_map_key outside an object").into()),
        }
    }

    fn skip_value(&mut self) -> Result<(), Self::Error> {
        self.take_raw().map(|_| ())
    }
}
