use serde::de::DeserializeOwned;
use serde::Serialize;

/// A statically-typed RPC method declaration (§4.9 "Parameter passing
/// shapes"). `Params`/`Output` are ordinary `serde` types: a struct
/// serializes as an Object (the "automatic expansion" shape for a single
/// reflected-record parameter), a tuple as an Array, and `()` serializes
/// as `null`/absent — so the three shapes the spec calls out fall out of
/// `serde`'s own derive behavior rather than needing hand-rolled
/// arity-dispatch here.
pub trait RpcMethod {
    const NAME: &'static str;
    type Params: Serialize + DeserializeOwned + Send + 'static;
    type Output: Serialize + DeserializeOwned + Send + 'static;
}
