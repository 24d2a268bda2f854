//! The selected set: the operator-chosen subset of available checks.
//!
//! Each [`SelectionSet`] entry holds one persistent pin on the owner of its
//! descriptor, so a selected check's plugin cannot finish unloading until the
//! entry is gone. Entries are created only from descriptors found in the
//! [`Registry`], and at most one entry exists per descriptor.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::descriptor::CheckDescriptor;
use crate::error::CheckError;
use crate::owner::{OwnerPin, PluginOwner};
use crate::registry::{Registry, first_match};
use crate::sync::lock;

const SELECTION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::selection");

#[derive(Debug)]
pub(crate) struct SelectionEntry {
    pub(crate) descriptor: Arc<CheckDescriptor>,
    _pin: OwnerPin,
}

/// Thread-safe, insertion-ordered subset of the registry's descriptors.
#[derive(Debug, Default)]
pub struct SelectionSet {
    entries: Mutex<Vec<SelectionEntry>>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the first registered check whose name or alias is `token`.
    ///
    /// The registry lock is held across lookup and insertion so that a
    /// concurrent [`Registry::unregister`] cannot interleave.
    ///
    /// # Errors
    ///
    /// - [`CheckError::NotFound`] when no registered check matches.
    /// - [`CheckError::AlreadyExists`] when the check is already selected; the
    ///   selection and pin counts are left untouched.
    /// - [`CheckError::InvalidOwner`] when the owning plugin is unloading.
    /// - [`CheckError::OutOfMemory`] when the selection cannot grow.
    pub fn select(&self, registry: &Registry, token: &str) -> Result<(), CheckError> {
        let available = registry.lock_entries();
        let descriptor = first_match(&available, token).ok_or_else(|| CheckError::NotFound {
            token: token.to_owned(),
        })?;
        let mut selected = lock(&self.entries);
        if position(&selected, descriptor).is_some() {
            return Err(CheckError::AlreadyExists {
                name: descriptor.name().to_owned(),
            });
        }
        insert(&mut selected, descriptor)
    }

    /// Selects every registered check that is not selected yet, in registry
    /// order.
    ///
    /// Every candidate is attempted even after a failure.
    ///
    /// # Errors
    ///
    /// Returns the last error encountered, if any.
    pub fn select_all(&self, registry: &Registry) -> Result<(), CheckError> {
        let available = registry.lock_entries();
        let mut selected = lock(&self.entries);
        let mut last_error = None;
        for entry in available.iter() {
            if position(&selected, &entry.descriptor).is_some() {
                continue;
            }
            if let Err(error) = insert(&mut selected, &entry.descriptor) {
                warn!(
                    target: SELECTION_TARGET,
                    check = entry.descriptor.name(),
                    error = %error,
                    "check skipped while selecting all"
                );
                last_error = Some(error);
            }
        }
        last_error.map_or(Ok(()), Err)
    }

    /// Removes the first selected check whose name or alias is `token`,
    /// releasing its pin.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NotFound`] when no selected check matches.
    pub fn remove(&self, token: &str) -> Result<(), CheckError> {
        let removed = {
            let mut selected = lock(&self.entries);
            let index = selected
                .iter()
                .position(|entry| entry.descriptor.matches(token))
                .ok_or_else(|| CheckError::NotFound {
                    token: token.to_owned(),
                })?;
            selected.remove(index)
        };
        info!(
            target: SELECTION_TARGET,
            check = removed.descriptor.name(),
            "check deselected"
        );
        drop(removed);
        Ok(())
    }

    /// Clears the selection, releasing every pin it held.
    ///
    /// Returns the number of entries removed.
    pub fn empty(&self) -> usize {
        let drained = std::mem::take(&mut *lock(&self.entries));
        let count = drained.len();
        drop(drained);
        info!(target: SELECTION_TARGET, count, "selection emptied");
        count
    }

    /// Returns `true` when this exact descriptor is selected.
    #[must_use]
    pub fn contains(&self, descriptor: &Arc<CheckDescriptor>) -> bool {
        position(&lock(&self.entries), descriptor).is_some()
    }

    /// Invokes `visitor` once per selected descriptor, in selection order.
    ///
    /// The selection lock is held throughout: the visitor must be a cheap,
    /// read-only projection and must not call back into the registry or the
    /// selection set.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&CheckDescriptor),
    {
        let selected = lock(&self.entries);
        for entry in selected.iter() {
            visitor(&entry.descriptor);
        }
    }

    /// Returns the number of selected checks.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Returns `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Number of entries whose descriptor belongs to `owner`.
    #[must_use]
    pub fn count_owned_by(&self, owner: &PluginOwner) -> usize {
        lock(&self.entries)
            .iter()
            .filter(|entry| entry.descriptor.owner().same_as(owner))
            .count()
    }

    /// Removes every entry for `descriptor`; called with the registry lock
    /// held.
    pub(crate) fn purge(&self, descriptor: &Arc<CheckDescriptor>) -> usize {
        let mut selected = lock(&self.entries);
        let before = selected.len();
        selected.retain(|entry| !Arc::ptr_eq(&entry.descriptor, descriptor));
        before.saturating_sub(selected.len())
    }

    pub(crate) fn lock_entries(&self) -> MutexGuard<'_, Vec<SelectionEntry>> {
        lock(&self.entries)
    }
}

fn position(selected: &[SelectionEntry], descriptor: &Arc<CheckDescriptor>) -> Option<usize> {
    selected
        .iter()
        .position(|entry| Arc::ptr_eq(&entry.descriptor, descriptor))
}

fn insert(
    selected: &mut Vec<SelectionEntry>,
    descriptor: &Arc<CheckDescriptor>,
) -> Result<(), CheckError> {
    selected.try_reserve(1)?;
    let pin = descriptor
        .owner()
        .acquire()
        .ok_or_else(|| CheckError::InvalidOwner {
            owner: descriptor.owner().name().to_owned(),
        })?;
    selected.push(SelectionEntry {
        descriptor: Arc::clone(descriptor),
        _pin: pin,
    });
    info!(
        target: SELECTION_TARGET,
        check = descriptor.name(),
        alias = descriptor.alias(),
        "check selected"
    );
    Ok(())
}
