//! Facade crate: re-exports the whole reflection-driven serialization
//! stack and JSON-RPC engine under one name, the way `nfs3` bundles the
//! generated XDR record types with `rpc_protocol` for its own binaries.
//! Depend on the individual `neko-*` crates directly if you only need
//! one layer (e.g. just the codecs, without the RPC engine).

pub use neko_derive::Reflect;

pub use neko_core::{
    CodecError, Decode, Encode, FieldRef, FieldRefMut, FieldTag, FlattenFields, Input, NodeKind,
    Output, Reflect as ReflectTrait, Severity, TagSet, MAX_NESTING_DEPTH,
};

pub mod json {
    pub use neko_json::*;
}

pub mod binary {
    pub use neko_binary::*;
}

pub mod print {
    pub use neko_print::*;
}

pub mod reflection {
    pub use neko_reflection::*;
}

pub mod proto {
    pub use neko_proto::*;
}

pub mod transport {
    pub use neko_transport::*;
}

pub mod rpc {
    pub use neko_rpc::*;
}

/// Re-exports of the names most call sites need, for a single `use
/// nekoproto::prelude::*;`.
pub mod prelude {
    pub use neko_core::{CodecError, Decode, Encode};
    pub use neko_derive::Reflect;
    pub use neko_proto::{register_proto, IProto, Proto, ProtoFactory, WireFormat};
    pub use neko_rpc::{Client, RpcError, RpcMethod, Server};
    pub use neko_transport::{MessageListener, MessageStream};
}
