use std::fmt;

/// Failure modes for the Reflection backend (§4.7). Unlike the byte/text
/// backends, there is no structural or framing failure possible here — a
/// table is built by one traversal and every subsequent query is either a
/// name that isn't bound, or a name that is bound to a different static
/// type than the caller asked for.
#[derive(Debug)]
pub enum ReflectionError {
    /// No field (or bound non-member value) is known under this name.
    NoSuchField(String),
    /// The field exists but was requested/assigned as the wrong static
    /// type — `get_field<T>`/`set_field<T>`'s type parameter didn't match
    /// the `TypeId` recorded when the field was captured or bound.
    TypeMismatch(String),
}

impl fmt::Display for ReflectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectionError::NoSuchField(name) => write!(f, "no field named `{name}`"),
            ReflectionError::TypeMismatch(name) => {
                write!(f, "field `{name}` is not of the requested type")
            }
        }
    }
}

impl std::error::Error for ReflectionError {}
