//! Shared helpers for planseed-cli unit tests.

use std::sync::{Mutex, MutexGuard};

/// Serializes tests that mutate process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take the environment lock for the duration of a test.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
