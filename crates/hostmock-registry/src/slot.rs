//! Named registry slots and their restoration handles.

use std::collections::HashMap;

use hostmock_core::HostMock;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

static REGISTRY: Lazy<Mutex<HashMap<String, HostMock>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Bind `mock` under `name`, replacing any prior binding.
///
/// The returned handle captures what was bound before (or that nothing
/// was) so the slot can be put back exactly. A second install under
/// the same name simply replaces the first.
pub fn install(name: &str, mock: HostMock) -> InstallHandle {
    let prior = REGISTRY.lock().insert(name.to_string(), mock);
    tracing::debug!(name, replaced = prior.is_some(), "installed mock");
    InstallHandle {
        name: name.to_string(),
        prior,
        restored: false,
    }
}

/// Look up the mock currently bound under `name`.
///
/// This is the seam for target code that cannot accept the host API as
/// a parameter. The handle it receives is the same tree the test
/// inspects.
pub fn resolve(name: &str) -> Option<HostMock> {
    REGISTRY.lock().get(name).cloned()
}

/// Captured prior state of one registry slot.
///
/// Restoring puts the slot back exactly as it was before the install:
/// re-bound if something was there, removed if not. Dropping the
/// handle restores too, so a panicking test still unwinds global
/// state; an explicit [`restore`](Self::restore) followed by the drop
/// is a no-op.
#[derive(Debug)]
pub struct InstallHandle {
    name: String,
    prior: Option<HostMock>,
    restored: bool,
}

impl InstallHandle {
    /// The name this handle's install bound.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Put the slot back to its pre-install state now.
    pub fn restore(mut self) {
        self.restore_slot();
    }

    fn restore_slot(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let mut registry = REGISTRY.lock();
        match self.prior.take() {
            Some(previous) => {
                registry.insert(self.name.clone(), previous);
                tracing::debug!(name = %self.name, "restored prior binding");
            }
            None => {
                registry.remove(&self.name);
                tracing::debug!(name = %self.name, "removed binding");
            }
        }
    }
}

impl Drop for InstallHandle {
    fn drop(&mut self) {
        self.restore_slot();
    }
}
