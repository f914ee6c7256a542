//! JSON-RPC 2.0 engine (§4.9): client, server, and the cooperative task
//! scope and peer state machine they share (§5). Sits on top of
//! `neko-transport`'s framed [`neko_transport::MessageStream`]s.

mod client;
mod error;
mod method;
mod peer;
mod scope;
mod server;
mod wire;

pub use client::Client;
pub use error::{RpcError, RpcErrorCode};
pub use method::RpcMethod;
pub use peer::PeerState;
pub use scope::TaskScope;
pub use server::{serve, MethodInfo, Server};
pub use wire::{ErrorObject, Id, Request, Response, ResponsePayload, V2_0};

#[cfg(test)]
mod tests {
    use super::*;
    use neko_transport::{TcpMessageListener, TcpMessageStream};
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Debug, Serialize, Deserialize)]
    struct AddParams {
        a: i64,
        b: i64,
    }

    struct Add;
    impl RpcMethod for Add {
        const NAME: &'static str = "add";
        type Params = AddParams;
        type Output = i64;
    }

    async fn spawn_pair() -> (Client<TcpMessageStream>, Arc<Server>) {
        let listener = TcpMessageListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = Arc::new(Server::new());
        server.register("add", &["a", "b"], |params| async move {
            let params: AddParams = serde_json::from_value(params.unwrap_or(serde_json::json!({})))
                .map_err(|_| RpcError::from_code(RpcErrorCode::InvalidParams))?;
            Ok(serde_json::json!(params.a + params.b))
        });

        let server_clone = Arc::clone(&server);
        tokio::spawn(async move {
            serve(server_clone, listener).await.ok();
        });

        let client = Client::new(TcpMessageStream::connect(addr).await.unwrap());
        (client, server)
    }

    #[tokio::test]
    async fn call_round_trips_a_typed_method() {
        let (client, _server) = spawn_pair().await;
        let sum = client.call::<Add>(AddParams { a: 2, b: 3 }).await.unwrap();
        assert_eq!(sum, 5);
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let (client, _server) = spawn_pair().await;
        let err = client
            .call_dynamic("does.not.exist", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Wire(ref obj) if obj.code == RpcErrorCode::MethodNotFound.code()));
    }

    #[tokio::test]
    async fn introspection_lists_registered_methods() {
        let (client, _server) = spawn_pair().await;
        let result = client.call_dynamic("rpc.get_bind_method_list", None).await.unwrap();
        let names: Vec<String> = serde_json::from_value(result).unwrap();
        assert!(names.contains(&"add".to_string()));
    }

    fn standalone_server() -> Arc<Server> {
        let server = Arc::new(Server::new());
        server.register("add", &["a", "b"], |params| async move {
            let params: AddParams = serde_json::from_value(params.unwrap_or(serde_json::json!({})))
                .map_err(|_| RpcError::from_code(RpcErrorCode::InvalidParams))?;
            Ok(serde_json::json!(params.a + params.b))
        });
        server
    }

    /// §4.9 "unknown → emit MethodNotFound ... unless the Request is a
    /// notification": a notification to an unbound method must still
    /// produce no response.
    #[tokio::test]
    async fn notification_to_unknown_method_produces_no_response() {
        let server = standalone_server();
        let request = br#"{"jsonrpc":"2.0","method":"does.not.exist","params":[1,2]}"#;
        assert!(server.dispatch(request).await.is_none());
    }

    /// Same rule applies to the builtin introspection methods, which are
    /// resolved inline rather than through the bound-method table.
    #[tokio::test]
    async fn notification_to_a_builtin_method_produces_no_response() {
        let server = standalone_server();
        let request = br#"{"jsonrpc":"2.0","method":"rpc.get_method_list"}"#;
        assert!(server.dispatch(request).await.is_none());
    }

    /// §8 invariant 6: a batch of K requests yields K minus notifications
    /// entries. A batch mixing a bound call, a notification to a bound
    /// method, and a notification to an unknown method must yield exactly
    /// one response entry.
    #[tokio::test]
    async fn batch_response_excludes_every_notification() {
        let server = standalone_server();
        let batch = br#"[
            {"jsonrpc":"2.0","method":"add","params":[1,2],"id":1},
            {"jsonrpc":"2.0","method":"add","params":[3,4]},
            {"jsonrpc":"2.0","method":"does.not.exist"}
        ]"#;
        let bytes = server.dispatch(batch).await.unwrap();
        let responses: Vec<Response> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, Id::Int(1));
    }
}
