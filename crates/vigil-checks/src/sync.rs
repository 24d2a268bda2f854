//! Lock helpers shared by the registry and selection collections.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Acquires `mutex`, recovering the guard if a previous holder panicked.
///
/// Plugin code never runs while a core lock is held, so a poisoned lock can
/// only come from a panic inside a listing visitor; the vectors behind these
/// locks are always left structurally intact.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
