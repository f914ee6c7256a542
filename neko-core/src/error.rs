use std::fmt;

/// How serious a codec failure is, mirroring the "kinds" enumerated in
/// §7 of the spec (structural / schema / runtime / transport / usage).
/// Backends attach one of these to their own concrete error type so
/// higher layers (the RPC engine) can translate uniformly into a wire
/// error code without downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Malformed bytes or JSON: the backend couldn't even tokenize.
    Structural,
    /// Well-formed input, but the wrong shape for the target type: a
    /// missing required field, a wrong size, a narrowing conversion.
    Schema,
    /// A composite was opened but never closed, or closed twice.
    Framing,
}

/// A backend-independent description of why a save/load call failed.
/// Concrete backends (`neko-json`, `neko-binary`, ...) return their own
/// error types that implement `std::error::Error`; this is what the
/// generic codecs in [`crate::codec`] use to decide *how* to fail (e.g.
/// whether a missing name_value_pair is tolerable under a `skippable`
/// tag) without needing to know the backend's concrete error type.
#[derive(Debug, Clone)]
pub struct CodecError {
    pub severity: Severity,
    pub message: String,
}

impl CodecError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Structural,
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Schema,
            message: message.into(),
        }
    }

    pub fn framing(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Framing,
            message: message.into(),
        }
    }

    pub fn missing_field(name: &str) -> Self {
        Self::schema(format!("missing required field `{name}`"))
    }

    pub fn size_mismatch(expected: usize, got: usize) -> Self {
        Self::schema(format!("expected {expected} elements, got {got}"))
    }

    pub fn depth_exceeded() -> Self {
        Self::structural("nesting depth exceeded MAX_NESTING_DEPTH; cyclic data is not supported")
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.severity, self.message)
    }
}

impl std::error::Error for CodecError {}
