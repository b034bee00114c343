//! Mock object standing in for a host editor's scripting API.
//!
//! Plugin code written against an editor's embedded-script interface can
//! only normally run inside the editor process. This crate provides a
//! substitute that is call-compatible with that interface: every
//! attribute access resolves to a usable sub-mock, every invocation is
//! recorded, and individual paths can be stubbed with fixed values,
//! dynamic closures, or simulated failures. Tests read the recorded
//! interactions back and assert against them.
//!
//! The mock does not emulate editor semantics. It observes.

pub mod call;
pub mod error;
pub mod node;
pub mod path;
pub mod stub;

pub use call::{CallArgs, CallOutcome, CallRecord, Event};
pub use error::{MockError, MockResult};
pub use node::{HostMock, MockNode, MockValue};
pub use path::MockPath;
pub use stub::{SimulatedFailure, Stub};
