//! Process-wide substitution of a mock for the host editor API.
//!
//! Plugin code should take the host API as a parameter where it can;
//! injection needs no registry at all. This crate covers the code that
//! cannot be changed: it binds a [`HostMock`] under the name the real
//! API is conventionally resolved by, so an unmodified "acquire the
//! host API" step receives the mock instead.
//!
//! Installing mutates one process-wide slot per name. Two tests that
//! install under the same name must not overlap; sequencing that is
//! the caller's job, and [`exclusive`] exists for callers that want a
//! ready-made lock for it.

mod lock;
mod slot;

pub use lock::{exclusive, is_locked, RegistryLock};
pub use slot::{install, resolve, InstallHandle};

pub use hostmock_core::HostMock;
