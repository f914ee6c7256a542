//! Shared method declaration for the `neko_echo_server`/`neko_echo_client`
//! demo pair: a minimal worked example of a reflected record used both as
//! a registered protocol type (`neko-proto`) and as an RPC method's
//! parameter shape (`neko-rpc`).

use neko_derive::Reflect;
use serde::{Deserialize, Serialize};

#[derive(Reflect, Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[neko(name = "demos.EchoParams")]
pub struct EchoParams {
    pub message: String,
}

impl neko_proto::Proto for EchoParams {}
neko_proto::register_proto!(EchoParams);

pub struct Echo;

impl neko_rpc::RpcMethod for Echo {
    const NAME: &'static str = "echo";
    type Params = EchoParams;
    type Output = String;
}
