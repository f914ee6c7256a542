//! Protocol Registry (§4.8): a process-wide mapping from a record type's
//! wire name to a type id and a type-erased constructor, populated at
//! static-init time via [`register_proto!`] and queried through
//! [`ProtoFactory`]. Grounded structurally on `xdr_codegen::symbol_table`
//! (a process-wide name-keyed table built once) and, for static
//! registration, on Design Notes §9's "linkme-style inventory"
//! recommendation.

mod error;
mod proto;
mod registry;

pub use error::ProtoError;
pub use proto::{IProto, Proto, WireFormat};
pub use registry::{ProtoDescriptor, ProtoFactory, PROTO_REGISTRATIONS, RESERVED_BASE};

#[doc(hidden)]
pub mod __private {
    pub use linkme;
}
