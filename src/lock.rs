use std::sync::{Mutex, MutexGuard};

/// Lock `lock`, recovering the inner value if a previous holder panicked.
///
/// The guarded values in this crate are plain flags and counters, so a
/// poisoned lock never leaves them half-written.
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            crate::log_debug(&format!("Mutex poisoned in {context}; recovering"));
            tracing::warn!(context, "recovered poisoned mutex");
            poisoned.into_inner()
        }
    }
}
