//! Execution of the selected checks.
//!
//! [`ExecutionEngine::run`] works in two phases:
//!
//! 1. **Snapshot** (selection lock held): every selected descriptor is pinned
//!    a second time. A descriptor whose owner refuses the pin is already
//!    unloading and is left out of this run.
//! 2. **Execution** (no lock held): each pinned descriptor runs in snapshot
//!    order, framed by a header and a separator, and its transient pin is
//!    released whether the check succeeded or not.
//!
//! Checks are foreign code and may block or call back into the registry, so
//! no core lock is ever held while one runs. The report reflects the
//! selection as it stood when the snapshot was taken.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::descriptor::{CheckDescriptor, Report};
use crate::error::CheckError;
use crate::owner::OwnerPin;
use crate::selection::SelectionSet;

const ENGINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::engine");

/// Counters describing one engine run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Checks that were invoked, successful or not.
    pub executed: usize,
    /// Invoked checks that reported a failure.
    pub failed: usize,
    /// Selected checks left out because their owner was unloading.
    pub skipped: usize,
}

impl RunSummary {
    /// Summary of a run that captured no snapshot: every selected check is
    /// counted as skipped.
    const fn abandoned(selected: usize) -> Self {
        Self {
            executed: 0,
            failed: 0,
            skipped: selected,
        }
    }
}

struct Pinned {
    descriptor: Arc<CheckDescriptor>,
    pin: OwnerPin,
}

/// Runs the selected checks and renders their report sections.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutionEngine;

impl ExecutionEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs every selected check in selection order, appending one section
    /// per check to `report`.
    ///
    /// The run as a whole never fails: checks whose owner is unloading are
    /// skipped silently and check failures are logged and counted.
    pub fn run(&self, selection: &SelectionSet, report: &mut Report) -> RunSummary {
        let (snapshot, skipped) = match snapshot(selection) {
            Ok(captured) => captured,
            Err(error) => {
                warn!(
                    target: ENGINE_TARGET,
                    error = %error,
                    "could not capture selection snapshot"
                );
                return RunSummary::abandoned(selection.len());
            }
        };
        debug!(
            target: ENGINE_TARGET,
            captured = snapshot.len(),
            skipped,
            "selection snapshot captured"
        );

        let mut summary = RunSummary {
            skipped,
            ..RunSummary::default()
        };
        for Pinned { descriptor, pin } in snapshot {
            report.line(&format!("==== {} ====", descriptor.alias()));
            if let Err(failure) = descriptor.run(report) {
                summary.failed += 1;
                warn!(
                    target: ENGINE_TARGET,
                    check = descriptor.name(),
                    error = %failure,
                    "check reported a failure"
                );
            }
            report.line("");
            summary.executed += 1;
            pin.release();
        }
        summary
    }
}

fn snapshot(selection: &SelectionSet) -> Result<(Vec<Pinned>, usize), CheckError> {
    let selected = selection.lock_entries();
    let mut pinned = Vec::new();
    pinned.try_reserve_exact(selected.len())?;
    let mut skipped = 0;
    for entry in selected.iter() {
        match entry.descriptor.owner().acquire() {
            Some(pin) => pinned.push(Pinned {
                descriptor: Arc::clone(&entry.descriptor),
                pin,
            }),
            None => skipped += 1,
        }
    }
    Ok((pinned, skipped))
}
