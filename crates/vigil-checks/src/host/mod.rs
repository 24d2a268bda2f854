//! The process-wide bundle of registry, selection, and engine.
//!
//! A host process builds exactly one [`CheckHost`] at start-up and calls
//! [`CheckHost::shutdown`] when it stops. Plugins talk to it through
//! [`CheckHost::register`] and [`CheckHost::unregister`]; the operator control
//! surface uses the selection and execution entry points.

use std::sync::Arc;

use tracing::info;

use crate::descriptor::{CheckDescriptor, Report};
use crate::engine::{ExecutionEngine, RunSummary};
use crate::error::CheckError;
use crate::owner::PluginOwner;
use crate::registry::Registry;
use crate::selection::SelectionSet;

const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");

/// Pins held on an owner next to the selection entries referencing it.
///
/// Outside of a running report the two numbers are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinParity {
    /// Outstanding pins on the owner.
    pub pins: usize,
    /// Selection entries whose descriptor belongs to the owner.
    pub entries: usize,
}

impl PinParity {
    /// Returns `true` when every pin is accounted for by a selection entry.
    #[must_use]
    pub const fn holds(&self) -> bool {
        self.pins == self.entries
    }
}

/// Registry, selection set, and execution engine of one host process.
///
/// # Example
///
/// ```
/// use vigil_checks::{CheckDescriptor, CheckFailure, CheckHost, PluginOwner, Report};
///
/// let host = CheckHost::new();
/// let owner = PluginOwner::new("plugina");
/// let hello = |report: &mut Report| {
///     report.line("hello");
///     Ok::<(), CheckFailure>(())
/// };
/// let descriptor = CheckDescriptor::builder("alpha", owner, hello)
///     .alias("a")
///     .build()
///     .expect("valid descriptor");
///
/// host.register(descriptor).expect("register");
/// host.select("a").expect("select");
/// assert_eq!(host.render_results(), "==== a ====\nhello\n\n");
/// host.shutdown();
/// ```
#[derive(Debug, Default)]
pub struct CheckHost {
    registry: Registry,
    selection: SelectionSet,
    engine: ExecutionEngine,
}

impl CheckHost {
    /// Creates a host with empty collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The available set.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The selected set.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Makes `descriptor` available.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::OutOfMemory`] if the registry cannot grow.
    pub fn register(&self, descriptor: Arc<CheckDescriptor>) -> Result<(), CheckError> {
        self.registry.register(descriptor)
    }

    /// Removes `descriptor` from the selection and then from the registry.
    pub fn unregister(&self, descriptor: &Arc<CheckDescriptor>) {
        self.registry.unregister(&self.selection, descriptor);
    }

    /// Looks up an available check by name or alias.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<Arc<CheckDescriptor>> {
        self.registry.lookup(token)
    }

    /// Selects an available check by name or alias.
    ///
    /// # Errors
    ///
    /// See [`SelectionSet::select`].
    pub fn select(&self, token: &str) -> Result<(), CheckError> {
        self.selection.select(&self.registry, token)
    }

    /// Selects every available check that is not selected yet.
    ///
    /// # Errors
    ///
    /// Returns the last error encountered; see [`SelectionSet::select_all`].
    pub fn select_all(&self) -> Result<(), CheckError> {
        self.selection.select_all(&self.registry)
    }

    /// Deselects a check by name or alias.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NotFound`] when no selected check matches.
    pub fn remove(&self, token: &str) -> Result<(), CheckError> {
        self.selection.remove(token)
    }

    /// Clears the selection. Returns the number of entries removed.
    pub fn empty(&self) -> usize {
        self.selection.empty()
    }

    /// Runs the selected checks into `report`.
    pub fn run(&self, report: &mut Report) -> RunSummary {
        self.engine.run(&self.selection, report)
    }

    /// Runs the selected checks and returns the rendered report.
    #[must_use]
    pub fn render_results(&self) -> String {
        let mut report = Report::new();
        let summary = self.run(&mut report);
        info!(
            target: HOST_TARGET,
            executed = summary.executed,
            failed = summary.failed,
            skipped = summary.skipped,
            "results rendered"
        );
        report.into_string()
    }

    /// Aliases of the available checks, in registry order.
    #[must_use]
    pub fn available_aliases(&self) -> Vec<String> {
        let mut aliases = Vec::new();
        self.registry
            .for_each(|descriptor| aliases.push(descriptor.alias().to_owned()));
        aliases
    }

    /// Names of the selected checks, in selection order.
    #[must_use]
    pub fn selected_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.selection
            .for_each(|descriptor| names.push(descriptor.name().to_owned()));
        names
    }

    /// Compares the pins held on `owner` with the selection entries that
    /// reference its descriptors.
    #[must_use]
    pub fn pin_parity(&self, owner: &PluginOwner) -> PinParity {
        PinParity {
            pins: owner.pin_count(),
            entries: self.selection.count_owned_by(owner),
        }
    }

    /// Tears the host down: empties the selection, then unregisters every
    /// remaining descriptor.
    pub fn shutdown(&self) {
        let released = self.selection.empty();
        let descriptors = self.registry.descriptors();
        for descriptor in &descriptors {
            self.unregister(descriptor);
        }
        info!(
            target: HOST_TARGET,
            released,
            unregistered = descriptors.len(),
            "check host shut down"
        );
    }
}
