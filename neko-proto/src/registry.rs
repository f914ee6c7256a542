use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::error::ProtoError;
use crate::proto::{IProto, Proto};

/// Auto-assigned ids start just above this (§3: "type ids assigned ...
/// within a `[reserved_base + 1 .. +∞)` range"). A `specify_type`-reserved
/// id must fall below it.
pub const RESERVED_BASE: u32 = 1000;

/// One entry produced by [`ProtoDescriptor::new`], gathered into the
/// `linkme` distributed slice below at static-init time, or passed to
/// [`ProtoFactory::register`] directly for dynamic (re-)registration.
pub struct ProtoDescriptor {
    pub name: &'static str,
    pub reserved_id: Option<u32>,
    construct: fn() -> IProto,
}

impl ProtoDescriptor {
    pub fn new<T: Proto>() -> Self {
        Self {
            name: T::type_name(),
            reserved_id: T::specify_type(),
            construct: || IProto::new(T::default(), T::type_name(), 0),
        }
    }
}

/// Static registrations gathered via [`register_proto!`] (Design Notes §9:
/// "explicit constructor or linkme-style inventory"). [`ProtoFactory`]
/// drains this once, at first use, to seed the process-wide registry.
#[linkme::distributed_slice]
pub static PROTO_REGISTRATIONS: [fn() -> ProtoDescriptor] = [..];

/// Register a type implementing [`crate::Proto`] into [`PROTO_REGISTRATIONS`]
/// so it is known to [`ProtoFactory`] before `main` runs — the Rust
/// realization of §4.1's macro form combined with Design Notes §9's
/// "linkme-style inventory" recommendation.
#[macro_export]
macro_rules! register_proto {
    ($ty:ty) => {
        #[$crate::__private::linkme::distributed_slice($crate::PROTO_REGISTRATIONS)]
        static __NEKO_PROTO_REGISTRATION: fn() -> $crate::ProtoDescriptor =
            || $crate::ProtoDescriptor::new::<$ty>();
    };
}

struct Entry {
    type_id: u32,
    construct: fn() -> IProto,
}

struct State {
    by_name: HashMap<String, Entry>,
    next_auto_id: u32,
}

impl State {
    fn bootstrap() -> Self {
        let mut descriptors: Vec<ProtoDescriptor> =
            PROTO_REGISTRATIONS.iter().map(|f| f()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(b.name));

        let mut by_name = HashMap::new();
        let mut next_auto_id = RESERVED_BASE + 1;
        for descriptor in descriptors {
            let type_id = descriptor.reserved_id.unwrap_or_else(|| {
                let id = next_auto_id;
                next_auto_id += 1;
                id
            });
            by_name.insert(
                descriptor.name.to_string(),
                Entry {
                    type_id,
                    construct: descriptor.construct,
                },
            );
        }
        Self {
            by_name,
            next_auto_id,
        }
    }
}

static FACTORY: OnceLock<RwLock<State>> = OnceLock::new();

fn state() -> &'static RwLock<State> {
    FACTORY.get_or_init(|| RwLock::new(State::bootstrap()))
}

/// Process-wide mapping from a record type's wire name to a type id and a
/// type-erased constructor (§4.8). Populated by [`register_proto!`] calls
/// gathered before `main` runs; [`ProtoFactory::register`] additionally
/// supports registering (or re-registering) a type at runtime.
pub struct ProtoFactory;

impl ProtoFactory {
    /// Register (or re-register) `descriptor`. Re-registering a name
    /// already present replaces its constructor and keeps its existing id
    /// (§3: "Re-registration of the same name replaces the prior
    /// constructor ... preserves the id" — §8 invariant 3) and logs a
    /// warning; a genuinely new name gets the next auto-assigned id.
    pub fn register(descriptor: ProtoDescriptor) {
        let mut guard = state().write().expect("protocol registry lock poisoned");
        let construct = descriptor.construct;
        if let Some(existing) = guard.by_name.get_mut(descriptor.name) {
            log::warn!(
                "re-registering protocol `{}`; replacing its constructor, keeping type id {}",
                descriptor.name,
                existing.type_id
            );
            existing.construct = construct;
        } else {
            let type_id = descriptor.reserved_id.unwrap_or_else(|| {
                let id = guard.next_auto_id;
                guard.next_auto_id += 1;
                id
            });
            guard.by_name.insert(
                descriptor.name.to_string(),
                Entry { type_id, construct },
            );
        }
    }

    /// Create a default-constructed handle by wire name (§3: "Creation is
    /// by name or by id").
    pub fn create(name: &str) -> Result<IProto, ProtoError> {
        let guard = state().read().expect("protocol registry lock poisoned");
        let entry = guard
            .by_name
            .get(name)
            .ok_or_else(|| ProtoError::Unknown(name.to_string()))?;
        let mut proto = (entry.construct)();
        proto.set_type_id(entry.type_id);
        Ok(proto)
    }

    /// Create a default-constructed handle by type id.
    pub fn create_by_id(id: u32) -> Result<IProto, ProtoError> {
        let guard = state().read().expect("protocol registry lock poisoned");
        let (_, entry) = guard
            .by_name
            .iter()
            .find(|(_, e)| e.type_id == id)
            .ok_or_else(|| ProtoError::Unknown(id.to_string()))?;
        let mut proto = (entry.construct)();
        proto.set_type_id(id);
        Ok(proto)
    }

    /// Look up the type id registered under `name`, if any.
    pub fn type_id_of(name: &str) -> Option<u32> {
        let guard = state().read().expect("protocol registry lock poisoned");
        guard.by_name.get(name).map(|e| e.type_id)
    }

    /// Look up the type id the registry assigned to `T` (§8 invariant 4:
    /// "`IProto::type_id()` equals `ProtoFactory::type_id<T>()` for the
    /// wrapped type T").
    pub fn type_id<T: Proto>() -> Option<u32> {
        Self::type_id_of(T::type_name())
    }

    /// Wrap an already-constructed value (§6.4: `emplace_proto(args...)`,
    /// `make_proto(other)`), looking up the registry for `T`'s type id
    /// rather than default-constructing one. The id is `0` if `T` was
    /// never registered — `encode`/`decode`/`reflection_object` still work
    /// against an unregistered type; only id-based lookups need the
    /// registration.
    pub fn wrap<T: Proto>(value: T) -> IProto {
        let type_id = Self::type_id::<T>().unwrap_or(0);
        IProto::new(value, T::type_name(), type_id)
    }
}
