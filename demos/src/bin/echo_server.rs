use std::sync::Arc;

use clap::Parser;
use demos::{Echo, EchoParams};
use neko_rpc::{serve, RpcMethod, Server};
use neko_transport::TcpMessageListener;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 9944)]
    port: u16,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let server = Arc::new(Server::new());
    server.register(Echo::NAME, &["message"], |params| async move {
        let params: EchoParams = serde_json::from_value(params.unwrap_or_default())
            .map_err(|e| neko_rpc::RpcError::wire(neko_rpc::RpcErrorCode::InvalidParams, e.to_string()))?;
        log::info!("echoing {:?}", params.message);
        Ok(serde_json::json!(params.message))
    });

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpMessageListener::bind(addr.as_str())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!("listening on {addr}");

    serve(server, listener)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))
}
