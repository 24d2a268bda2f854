//! The available set: every check currently contributed by a loaded plugin.
//!
//! The [`Registry`] keeps descriptors in insertion order behind one mutex.
//! Lookups return the first descriptor whose name or alias matches, so the
//! earliest registration wins when identifiers collide.
//!
//! Lock ordering: any operation that also touches the [`SelectionSet`] takes
//! the registry lock first and the selection lock second.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::descriptor::CheckDescriptor;
use crate::error::CheckError;
use crate::selection::SelectionSet;
use crate::sync::lock;

const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

#[derive(Debug)]
pub(crate) struct RegistryEntry {
    pub(crate) descriptor: Arc<CheckDescriptor>,
}

/// Thread-safe, insertion-ordered collection of available checks.
///
/// # Example
///
/// ```
/// use vigil_checks::{CheckDescriptor, CheckFailure, PluginOwner, Registry, Report};
///
/// let registry = Registry::new();
/// let owner = PluginOwner::new("plugina");
/// let check = |_: &mut Report| Ok::<(), CheckFailure>(());
/// let descriptor = CheckDescriptor::builder("alpha", owner, check)
///     .alias("a")
///     .build()
///     .expect("valid descriptor");
///
/// registry.register(descriptor).expect("registration succeeds");
/// assert_eq!(registry.lookup("a").map(|d| d.name().to_owned()), Some("alpha".into()));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<Vec<RegistryEntry>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `descriptor` to the available set.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::OutOfMemory`] if the collection cannot grow.
    pub fn register(&self, descriptor: Arc<CheckDescriptor>) -> Result<(), CheckError> {
        let mut entries = lock(&self.entries);
        entries.try_reserve(1)?;
        info!(
            target: REGISTRY_TARGET,
            check = descriptor.name(),
            alias = descriptor.alias(),
            owner = descriptor.owner().name(),
            "check registered"
        );
        entries.push(RegistryEntry { descriptor });
        Ok(())
    }

    /// Removes `descriptor` from both `selection` and the registry.
    ///
    /// Both locks are held for the whole operation, so a concurrent
    /// [`SelectionSet::select`] either completes before the removal (and its
    /// entry is purged here) or runs afterwards and no longer finds the
    /// descriptor. Selection entries are purged first, releasing their pins.
    pub fn unregister(&self, selection: &SelectionSet, descriptor: &Arc<CheckDescriptor>) {
        let mut entries = lock(&self.entries);
        let deselected = selection.purge(descriptor);
        let before = entries.len();
        entries.retain(|entry| !Arc::ptr_eq(&entry.descriptor, descriptor));
        let removed = before.saturating_sub(entries.len());
        drop(entries);

        if removed == 0 {
            debug!(
                target: REGISTRY_TARGET,
                check = descriptor.name(),
                "unregister ignored for unknown check"
            );
            return;
        }
        info!(
            target: REGISTRY_TARGET,
            check = descriptor.name(),
            deselected,
            "check unregistered"
        );
    }

    /// Returns the first descriptor whose name or alias equals `token`.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<Arc<CheckDescriptor>> {
        let entries = lock(&self.entries);
        first_match(&entries, token).map(Arc::clone)
    }

    /// Returns `true` when this exact descriptor is registered.
    #[must_use]
    pub fn contains(&self, descriptor: &Arc<CheckDescriptor>) -> bool {
        lock(&self.entries)
            .iter()
            .any(|entry| Arc::ptr_eq(&entry.descriptor, descriptor))
    }

    /// Invokes `visitor` once per descriptor, in registration order.
    ///
    /// The registry lock is held throughout: the visitor must be a cheap,
    /// read-only projection and must not call back into the registry or the
    /// selection set.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&CheckDescriptor),
    {
        let entries = lock(&self.entries);
        for entry in entries.iter() {
            visitor(&entry.descriptor);
        }
    }

    /// Returns a copy of the registered descriptors, in order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<Arc<CheckDescriptor>> {
        lock(&self.entries)
            .iter()
            .map(|entry| Arc::clone(&entry.descriptor))
            .collect()
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Returns `true` when no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    pub(crate) fn lock_entries(&self) -> MutexGuard<'_, Vec<RegistryEntry>> {
        lock(&self.entries)
    }
}

pub(crate) fn first_match<'a>(
    entries: &'a [RegistryEntry],
    token: &str,
) -> Option<&'a Arc<CheckDescriptor>> {
    entries
        .iter()
        .map(|entry| &entry.descriptor)
        .find(|descriptor| descriptor.matches(token))
}
