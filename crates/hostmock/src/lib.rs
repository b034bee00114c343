//! Mock of a text editor's scripting API for testing plugins outside
//! the editor.
//!
//! Plugin code written against an editor's embedded-script interface
//! normally only runs inside the editor process. This crate supplies a
//! substitute: a [`HostMock`] that is call-compatible with that
//! interface, records every interaction, and can be stubbed per path —
//! plus a process-wide registry that stands the mock in for the real
//! API where target code cannot take it as a parameter.
//!
//! ```
//! use hostmock::{HostMock, Stub};
//!
//! let mock = HostMock::new();
//! mock.configure("current.buffer.name", Stub::returns("test.py")).unwrap();
//!
//! // Target code sees an ordinary API surface.
//! let name = mock.attr("current").attr("buffer").attr("name").call0().unwrap();
//! assert_eq!(name.as_str(), Some("test.py"));
//!
//! // The test sees what was called.
//! assert_eq!(mock.calls("current.buffer.name").len(), 1);
//! ```

pub mod editor;
pub mod requirements;
pub mod version;

pub use hostmock_core::{
    CallArgs, CallOutcome, CallRecord, Event, HostMock, MockError, MockNode, MockPath, MockResult,
    MockValue, SimulatedFailure, Stub,
};
pub use hostmock_registry as registry;
