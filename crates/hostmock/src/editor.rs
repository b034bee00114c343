//! Conventional editor surface, pre-stubbed.
//!
//! Plugins against the editor's scripting API lean on a handful of
//! well-known paths. [`mock_editor`] returns a [`HostMock`] with those
//! paths stubbed to neutral defaults, so unmodified plugin code gets
//! plausible values without per-test setup; anything else still
//! auto-expands as usual.

use hostmock_core::{HostMock, MockResult, Stub};
use hostmock_registry::InstallHandle;
use serde_json::json;

/// Registry name the editor API is conventionally resolved by.
pub const EDITOR_REGISTRY_NAME: &str = "editor";

/// Well-known paths of the editor surface.
pub mod paths {
    /// Name of the buffer in the current window.
    pub const BUFFER_NAME: &str = "current.buffer.name";
    /// Lines of the buffer in the current window.
    pub const BUFFER_TEXT: &str = "current.buffer.text";
    /// Ex-command entry point.
    pub const COMMAND: &str = "command";
    /// Expression evaluation entry point.
    pub const EVAL: &str = "eval";
}

/// A mock tree pre-stubbed with the conventional editor paths: an
/// unnamed empty buffer, and `command`/`eval` entry points that accept
/// anything and return nothing.
pub fn mock_editor() -> HostMock {
    let mock = HostMock::new();
    wire_defaults(&mock).expect("default editor paths are valid");
    mock
}

fn wire_defaults(mock: &HostMock) -> MockResult<()> {
    mock.configure(paths::BUFFER_NAME, Stub::returns(""))?;
    mock.configure(paths::BUFFER_TEXT, Stub::returns(json!([])))?;
    mock.configure(paths::COMMAND, Stub::returns(json!(null)))?;
    mock.configure(paths::EVAL, Stub::returns(json!(null)))?;
    Ok(())
}

/// Install `mock` under the conventional editor name.
pub fn install_editor(mock: HostMock) -> InstallHandle {
    hostmock_registry::install(EDITOR_REGISTRY_NAME, mock)
}
