use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use log::{trace, warn};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::error::{RpcError, RpcErrorCode};
use crate::scope::TaskScope;
use crate::wire::{parse_incoming, ErrorObject, Id, IncomingMessage, Request, Response};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
type HandlerFn = Arc<dyn Fn(Option<Value>) -> BoxFuture<'static, Result<Value, RpcError>> + Send + Sync>;

struct MethodEntry {
    params: Vec<String>,
    handler: HandlerFn,
}

/// Human-readable signature returned by `rpc.get_method_info` (§4.9).
#[derive(Debug, Clone, serde::Serialize)]
pub struct MethodInfo {
    pub name: String,
    pub params: Vec<String>,
}

/// Dispatches incoming JSON-RPC bytes to registered handlers (§4.9
/// "Server contract"). One `Server` is shared (via `Arc`) across however
/// many peers/transports a process exposes it on; registration happens
/// once up front and the method table is read-only thereafter, matching
/// §5's "shared resources" model for the protocol registry.
pub struct Server {
    methods: RwLock<HashMap<String, MethodEntry>>,
    scope: TaskScope,
}

impl Server {
    pub fn new() -> Self {
        Self {
            methods: RwLock::new(HashMap::new()),
            scope: TaskScope::new(),
        }
    }

    /// Registers a handler for `name`. `params` lists the declared
    /// parameter names in order, used only for introspection — it does
    /// not constrain how `handler` is invoked.
    pub fn register<F, Fut>(&self, name: impl Into<String>, params: &[&str], handler: F)
    where
        F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, RpcError>> + Send + 'static,
    {
        let entry = MethodEntry {
            params: params.iter().map(|s| s.to_string()).collect(),
            handler: Arc::new(move |p| Box::pin(handler(p))),
        };
        self.methods.write().unwrap().insert(name.into(), entry);
    }

    pub fn cancel(&self, id: &Id) -> bool {
        self.scope.cancel(id)
    }

    pub fn cancel_all(&self) {
        self.scope.cancel_all()
    }

    fn method_list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.read().unwrap().keys().cloned().collect();
        names.extend(
            [
                "rpc.get_method_list",
                "rpc.get_bind_method_list",
                "rpc.get_method_info",
                "rpc.get_method_info_list",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        names.sort();
        names
    }

    fn method_info(&self, name: &str) -> Option<MethodInfo> {
        self.methods.read().unwrap().get(name).map(|e| MethodInfo {
            name: name.to_string(),
            params: e.params.clone(),
        })
    }

    /// Handles one already-parsed request, returning the response to
    /// emit (`None` for a notification). Introspection methods are
    /// resolved inline rather than via the user method table.
    async fn handle_one(self: &Arc<Self>, request: Request) -> Option<Response> {
        let id = request.id.clone();

        // Builtin and unknown methods are resolved inline below rather than
        // through `run_tracked`, which is the only path that otherwise
        // suppresses a response for a notification (§4.9: "unless the
        // Request is a notification"). Short-circuit here so an unbound
        // notification never contributes a response/array entry either.
        let is_registered = self.methods.read().unwrap().contains_key(request.method.as_str());
        if request.is_notification() && !is_registered {
            return None;
        }

        let result = match request.method.as_str() {
            "rpc.get_method_list" => Ok(json!(self.method_list())),
            "rpc.get_bind_method_list" => {
                let mut names: Vec<String> =
                    self.methods.read().unwrap().keys().cloned().collect();
                names.sort();
                Ok(json!(names))
            }
            "rpc.get_method_info" => {
                let name = request
                    .params
                    .as_ref()
                    .and_then(|v| v.get(0).or_else(|| v.get("name")))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match name.and_then(|n| self.method_info(&n)) {
                    Some(info) => Ok(serde_json::to_value(info).unwrap()),
                    None => Err(RpcError::from_code(RpcErrorCode::MethodNotFound)),
                }
            }
            "rpc.get_method_info_list" => {
                let mut infos: Vec<MethodInfo> = self
                    .methods
                    .read()
                    .unwrap()
                    .iter()
                    .map(|(name, entry)| MethodInfo {
                        name: name.clone(),
                        params: entry.params.clone(),
                    })
                    .collect();
                infos.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(serde_json::to_value(infos).unwrap())
            }
            name => match self.methods.read().unwrap().get(name) {
                Some(entry) => {
                    let handler = entry.handler.clone();
                    let params = request.params.clone();
                    return self.run_tracked(id, handler, params).await;
                }
                None => Err(RpcError::from_code(RpcErrorCode::MethodNotFound)),
            },
        };

        let id = id.unwrap_or(Id::Null);
        Some(match result {
            Ok(value) => Response::success(id, value),
            Err(e) => Response::failure(id, e.into_error_object()),
        })
    }

    /// Spawns the handler as a cooperative task tracked by request id
    /// (§5 "Suspension points" / §4.9 cancellation), and awaits its
    /// result to assemble the in-order batch response. If the task is
    /// cancelled mid-flight, no response is produced for it (§4.9: "the
    /// request simply never completes").
    async fn run_tracked(
        self: &Arc<Self>,
        id: Option<Id>,
        handler: HandlerFn,
        params: Option<Value>,
    ) -> Option<Response> {
        let Some(id) = id else {
            // Notification: run to completion but discard the outcome.
            let _ = handler(params).await;
            return None;
        };

        let (tx, rx) = oneshot::channel();
        let scope_id = id.clone();
        let task_id = id.clone();
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = handler(params).await;
            let _ = tx.send(result);
            this.scope.finish(&task_id);
        });
        self.scope.track(scope_id, handle);

        match rx.await {
            Ok(Ok(value)) => Some(Response::success(id, value)),
            Ok(Err(e)) => Some(Response::failure(id, e.into_error_object())),
            Err(_) => None,
        }
    }

    /// Parses `bytes` as a single Request, a batch, or garbage, and
    /// returns the bytes to send back (`None` when nothing should be
    /// sent: an all-notification batch, or an empty batch array).
    pub async fn dispatch(self: &Arc<Self>, bytes: &[u8]) -> Option<Vec<u8>> {
        match parse_incoming(bytes) {
            IncomingMessage::Garbage => {
                let response = Response::failure(
                    Id::Null,
                    ErrorObject {
                        code: RpcErrorCode::ParseError.code(),
                        message: RpcErrorCode::ParseError.default_message().to_string(),
                        data: None,
                    },
                );
                Some(serde_json::to_vec(&response).ok()?)
            }
            IncomingMessage::Single(request) => {
                trace!("dispatching method `{}`", request.method);
                let response = self.handle_one(request).await?;
                serde_json::to_vec(&response).ok()
            }
            IncomingMessage::Batch(requests) => {
                let futures = requests.into_iter().map(|r| {
                    let this = Arc::clone(self);
                    async move { this.handle_one(r).await }
                });
                let responses: Vec<Response> = futures::future::join_all(futures)
                    .await
                    .into_iter()
                    .flatten()
                    .collect();
                if responses.is_empty() {
                    None
                } else {
                    serde_json::to_vec(&responses).ok()
                }
            }
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the accept/dispatch loop for a single listener, logging and
/// continuing past per-connection errors. Grounded on
/// `rpc_protocol::RpcProgram::run_blocking_tcp_server`'s shape, adapted
/// to the async `MessageListener`/`MessageStream` traits.
pub async fn serve<L: neko_transport::MessageListener>(
    server: Arc<Server>,
    mut listener: L,
) -> Result<(), neko_transport::TransportError>
where
    L::Stream: 'static,
{
    loop {
        let mut stream = match listener.accept().await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("error accepting connection: {e}");
                continue;
            }
        };
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            loop {
                let message = match stream.recv().await {
                    Ok(message) => message,
                    Err(_) => break,
                };
                if let Some(response) = server.dispatch(&message).await {
                    if stream.send(&response).await.is_err() {
                        break;
                    }
                }
            }
            stream.close().await;
        });
    }
}
