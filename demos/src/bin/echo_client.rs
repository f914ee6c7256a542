use clap::Parser;
use demos::{Echo, EchoParams};
use neko_rpc::Client;
use neko_transport::TcpMessageStream;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 9944)]
    port: u16,

    /// Message to echo off the server.
    message: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let addr = format!("{}:{}", args.host, args.port);
    let stream = TcpMessageStream::connect(addr.as_str())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let client = Client::new(stream);

    let reply = client
        .call::<Echo>(EchoParams {
            message: args.message,
        })
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    println!("{reply}");
    client.close().await;
    Ok(())
}
