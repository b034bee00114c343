//! Voluntary serialization of installs under one name.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

static LOCKS: Lazy<Mutex<HashMap<String, Arc<AtomicBool>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Acquire the exclusive lock for `name`, blocking until it is free.
///
/// The registry itself never enforces sequencing; tests that install
/// under a shared name hold one of these around the install/restore
/// window instead.
pub fn exclusive(name: &str) -> RegistryLock {
    let flag = {
        let mut locks = LOCKS.lock();
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone()
    };

    while flag
        .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
        .is_err()
    {
        std::thread::yield_now();
    }
    tracing::debug!(name, "acquired registry lock");

    RegistryLock {
        name: name.to_string(),
        flag,
    }
}

/// Whether the lock for `name` is currently held.
pub fn is_locked(name: &str) -> bool {
    LOCKS
        .lock()
        .get(name)
        .map(|flag| flag.load(Ordering::Acquire))
        .unwrap_or(false)
}

/// Held exclusive lock for one registry name; released on drop.
pub struct RegistryLock {
    name: String,
    flag: Arc<AtomicBool>,
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        tracing::debug!(name = %self.name, "released registry lock");
    }
}
