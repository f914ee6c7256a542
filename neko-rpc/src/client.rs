use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use neko_transport::MessageStream;
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{RpcError, RpcErrorCode};
use crate::method::RpcMethod;
use crate::peer::PeerState;
use crate::wire::{Id, Request, Response, ResponsePayload};

/// The client half of a JSON-RPC peer (§4.9 "Client contract"). Owns the
/// transport exclusively; `stream` is wrapped in an async mutex that is
/// held from "encode params" through "receive response" so that at most
/// one request is outstanding on the wire at a time (§5 "Ordering
/// guarantees") — responses therefore match requests by position as
/// well as by id.
pub struct Client<S> {
    stream: AsyncMutex<S>,
    next_id: AtomicI64,
    state: StdMutex<PeerState>,
}

impl<S: MessageStream> Client<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: AsyncMutex::new(stream),
            next_id: AtomicI64::new(1),
            state: StdMutex::new(PeerState::Ready),
        }
    }

    pub fn state(&self) -> PeerState {
        *self.state.lock().unwrap()
    }

    fn next_id(&self) -> Id {
        Id::Int(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Statically-typed call (§4.9 `call<Method>`).
    pub async fn call<M: RpcMethod>(&self, params: M::Params) -> Result<M::Output, RpcError> {
        let params = serde_json::to_value(params).map_err(|e| RpcError::Codec(e.to_string()))?;
        let result = self.call_dynamic(M::NAME, Some(params)).await?;
        serde_json::from_value(result).map_err(|e| RpcError::Codec(e.to_string()))
    }

    /// `call_with_timeout<Method>` (added to the client contract per
    /// DESIGN.md: the spec's Non-goals don't exclude it).
    pub async fn call_with_timeout<M: RpcMethod>(
        &self,
        params: M::Params,
        timeout: Duration,
    ) -> Result<M::Output, RpcError> {
        tokio::time::timeout(timeout, self.call::<M>(params))
            .await
            .unwrap_or(Err(RpcError::Timeout))
    }

    /// `notify<Method>` — sends a Request without an id and returns once
    /// the bytes are flushed; no response is awaited.
    pub async fn notify<M: RpcMethod>(&self, params: M::Params) -> Result<(), RpcError> {
        let params = serde_json::to_value(params).map_err(|e| RpcError::Codec(e.to_string()))?;
        self.notify_dynamic(M::NAME, Some(params)).await
    }

    pub async fn notify_dynamic(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<(), RpcError> {
        if !self.state().is_ready() {
            return Err(RpcError::from_code(RpcErrorCode::ClientNotInit));
        }
        let request = Request::notification(method, params);
        let bytes = serde_json::to_vec(&request).map_err(|e| RpcError::Codec(e.to_string()))?;
        self.stream.lock().await.send(&bytes).await?;
        Ok(())
    }

    /// `call_remote<name>` — dynamic variant keyed by a runtime string.
    /// When `params` is an object, the declared parameter names are
    /// fetched via `rpc.get_method_info` first and checked against the
    /// caller's supplied keys; a mismatch fails before anything is sent
    /// over the wire for the real call (a second request still goes out
    /// for the introspection lookup itself).
    pub async fn call_remote(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        if let Value::Object(ref supplied) = params {
            let info = self
                .call_dynamic("rpc.get_method_info", Some(serde_json::json!([method])))
                .await?;
            let declared: Vec<String> = info
                .get("params")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let declared_set: std::collections::BTreeSet<&str> =
                declared.iter().map(String::as_str).collect();
            let supplied_set: std::collections::BTreeSet<&str> =
                supplied.keys().map(String::as_str).collect();
            if declared_set != supplied_set {
                return Err(RpcError::wire(
                    RpcErrorCode::InvalidParams,
                    format!(
                        "parameter names {supplied_set:?} do not match declared {declared_set:?} for `{method}`"
                    ),
                ));
            }
        }
        self.call_dynamic(method, Some(params)).await
    }

    /// Sends `method`/`params` as a Request with a freshly issued id,
    /// then waits for the matching Response (§4.9: "rejects a response
    /// whose id does not match the most recently issued request id").
    pub async fn call_dynamic(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, RpcError> {
        if !self.state().is_ready() {
            return Err(RpcError::from_code(RpcErrorCode::ClientNotInit));
        }
        let id = self.next_id();
        let request = Request::call(id.clone(), method, params);
        let bytes = serde_json::to_vec(&request).map_err(|e| RpcError::Codec(e.to_string()))?;

        let mut stream = self.stream.lock().await;
        stream.send(&bytes).await?;
        let reply_bytes = stream.recv().await?;
        drop(stream);

        let response = serde_json::from_slice::<Response>(&reply_bytes)
            .map_err(|_| RpcError::from_code(RpcErrorCode::ParseError))?;

        if response.id != id {
            return Err(RpcError::from_code(RpcErrorCode::ResponseIdNotMatch));
        }

        match response.payload {
            ResponsePayload::Result { result } => Ok(result),
            ResponsePayload::Error { error } => Err(RpcError::Wire(error)),
        }
    }

    /// Marks the peer `Done` and releases the transport (§4.9 state
    /// machine: `READY → (closed by caller or transport) → DONE`).
    pub async fn close(&self) {
        *self.state.lock().unwrap() = PeerState::Done;
        self.stream.lock().await.close().await;
    }
}
