//! Reflection backend (§4.7): neither reads nor writes bytes. Traversing a
//! record through it collects a map `name -> (type_id, pointer)`, which
//! post-hoc queries then consult — `get_field`/`set_field`/`bind_field` —
//! grounded structurally on `xdr_codegen::symbol_table` (a name-keyed table
//! built by one traversal, queried afterward) and, for the actual storage
//! contract, on `original_source/include/nekoproto/proto/private/reflection_serializer.hpp`.

mod error;
mod table;

pub use error::ReflectionError;
pub use table::{ReflectionTable, ReflectionTableMut};
