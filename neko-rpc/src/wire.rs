use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `jsonrpc` version marker (§6.1): always serializes as the literal
/// string `"2.0"`. Grounded on `vitiral-jrpc`'s `V2_0` unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct V2_0;

impl Serialize for V2_0 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for V2_0 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "2.0" {
            Ok(V2_0)
        } else {
            Err(serde::de::Error::custom(format!(
                "unsupported jsonrpc version `{s}`"
            )))
        }
    }
}

/// A request id: string, integer, or absent (notification). Grounded on
/// `vitiral-jrpc`'s `Id`/`IdReq` split, collapsed to one type here since
/// this engine distinguishes notifications by `Option<Id>` instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    String(String),
    Int(i64),
    Null,
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Id::Int(v)
    }
}

impl From<String> for Id {
    fn from(v: String) -> Self {
        Id::String(v)
    }
}

/// A JSON-RPC 2.0 Request object (§6.1). `params` is absent for
/// zero-argument calls, an Array for positional/tuple arguments, or an
/// Object when the argument type is a reflected record — serde's default
/// struct encoding already produces that shape, so no special-casing is
/// needed in this layer (Open Question resolved in DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: V2_0,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl Request {
    pub fn call(id: Id, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: V2_0,
            method: method.into(),
            params,
            id: Some(id),
        }
    }

    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: V2_0,
            method: method.into(),
            params,
            id: None,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Method names beginning `rpc.` are reserved for the introspection
    /// surface (§4.9).
    pub fn is_system_extension(&self) -> bool {
        self.method.starts_with("rpc.")
    }
}

/// The wire error object (§6.1/§6.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC 2.0 Response object. `result` and `error` are mutually
/// exclusive, matched on deserialize via the untagged payload enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: V2_0,
    #[serde(flatten)]
    pub payload: ResponsePayload,
    pub id: Id,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Result { result: Value },
    Error { error: ErrorObject },
}

impl Response {
    pub fn success(id: Id, result: Value) -> Self {
        Self {
            jsonrpc: V2_0,
            payload: ResponsePayload::Result { result },
            id,
        }
    }

    pub fn failure(id: Id, error: ErrorObject) -> Self {
        Self {
            jsonrpc: V2_0,
            payload: ResponsePayload::Error { error },
            id,
        }
    }
}

/// One incoming message: a single Request, a batch, or unparsable bytes.
/// Grounded on §4.9's server contract ("Incoming bytes form either a
/// single Request, a batch ... or garbage").
pub enum IncomingMessage {
    Single(Request),
    Batch(Vec<Request>),
    Garbage,
}

pub fn parse_incoming(bytes: &[u8]) -> IncomingMessage {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(items)) => {
            let mut requests = Vec::with_capacity(items.len());
            for item in items {
                match serde_json::from_value(item) {
                    Ok(req) => requests.push(req),
                    Err(_) => return IncomingMessage::Garbage,
                }
            }
            IncomingMessage::Batch(requests)
        }
        Ok(value) => match serde_json::from_value(value) {
            Ok(req) => IncomingMessage::Single(req),
            Err(_) => IncomingMessage::Garbage,
        },
        Err(_) => IncomingMessage::Garbage,
    }
}
