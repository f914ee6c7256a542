use std::fmt;

use crate::wire::ErrorObject;

/// Fixed JSON-RPC codes plus the server-reserved `-32000..-32099` range
/// (§4.9, §6.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    MethodNotBound,
    ClientNotInit,
    ResponseIdNotMatch,
    MessageTooLarge,
    Custom(i64),
}

impl RpcErrorCode {
    pub fn code(self) -> i64 {
        match self {
            RpcErrorCode::ParseError => -32700,
            RpcErrorCode::InvalidRequest => -32600,
            RpcErrorCode::MethodNotFound => -32601,
            RpcErrorCode::InvalidParams => -32602,
            RpcErrorCode::InternalError => -32603,
            RpcErrorCode::MethodNotBound => -32000,
            RpcErrorCode::ClientNotInit => -32001,
            RpcErrorCode::ResponseIdNotMatch => -32002,
            RpcErrorCode::MessageTooLarge => -32003,
            RpcErrorCode::Custom(code) => code,
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            RpcErrorCode::ParseError => "Parse error",
            RpcErrorCode::InvalidRequest => "Invalid Request",
            RpcErrorCode::MethodNotFound => "Method not found",
            RpcErrorCode::InvalidParams => "Invalid params",
            RpcErrorCode::InternalError => "Internal error",
            RpcErrorCode::MethodNotBound => "Method not bound",
            RpcErrorCode::ClientNotInit => "Client not initialised",
            RpcErrorCode::ResponseIdNotMatch => "Response id does not match request id",
            RpcErrorCode::MessageTooLarge => "Message too large",
            RpcErrorCode::Custom(_) => "RPC error",
        }
    }
}

/// A structural, usage, or transport failure surfaced to an RPC caller
/// or handler (§7: *usage* and *transport* kinds; *runtime* kind is
/// whatever a handler itself returns wrapped in [`RpcError::Handler`]).
#[derive(Debug)]
pub enum RpcError {
    Wire(ErrorObject),
    Transport(neko_transport::TransportError),
    Codec(String),
    Cancelled,
    Timeout,
}

impl RpcError {
    pub fn wire(code: RpcErrorCode, message: impl Into<String>) -> Self {
        RpcError::Wire(ErrorObject {
            code: code.code(),
            message: message.into(),
            data: None,
        })
    }

    pub fn from_code(code: RpcErrorCode) -> Self {
        Self::wire(code, code.default_message())
    }

    pub fn into_error_object(self) -> ErrorObject {
        match self {
            RpcError::Wire(obj) => obj,
            RpcError::Transport(e) => ErrorObject {
                code: RpcErrorCode::InternalError.code(),
                message: format!("transport error: {e}"),
                data: None,
            },
            RpcError::Codec(msg) => ErrorObject {
                code: RpcErrorCode::ParseError.code(),
                message: msg,
                data: None,
            },
            RpcError::Cancelled => ErrorObject {
                code: RpcErrorCode::InternalError.code(),
                message: "request cancelled".to_string(),
                data: None,
            },
            RpcError::Timeout => ErrorObject {
                code: RpcErrorCode::InternalError.code(),
                message: "request timed out".to_string(),
                data: None,
            },
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Wire(obj) => write!(f, "{} ({})", obj.message, obj.code),
            RpcError::Transport(e) => write!(f, "transport error: {e}"),
            RpcError::Codec(msg) => write!(f, "codec error: {msg}"),
            RpcError::Cancelled => write!(f, "request cancelled"),
            RpcError::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for RpcError {}

impl From<neko_transport::TransportError> for RpcError {
    fn from(e: neko_transport::TransportError) -> Self {
        RpcError::Transport(e)
    }
}

impl From<ErrorObject> for RpcError {
    fn from(obj: ErrorObject) -> Self {
        RpcError::Wire(obj)
    }
}
