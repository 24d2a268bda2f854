//! Plugin-side half of the registration contract.
//!
//! A plugin registers each of its descriptors exactly once when it becomes
//! available and unregisters each exactly once, synchronously, before it goes
//! away. [`LoadedPlugin`] packages that contract for a set of descriptors that
//! share one [`PluginOwner`].

use std::sync::Arc;

use tracing::info;

use crate::descriptor::CheckDescriptor;
use crate::error::CheckError;
use crate::host::CheckHost;
use crate::owner::PluginOwner;

const PLUGIN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::plugin");

/// A plugin whose checks are registered with a [`CheckHost`].
#[derive(Debug)]
pub struct LoadedPlugin {
    owner: PluginOwner,
    descriptors: Vec<Arc<CheckDescriptor>>,
}

impl LoadedPlugin {
    /// Registers every descriptor with `host`.
    ///
    /// When a registration fails, the descriptors registered so far are
    /// unregistered again before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidArgument`] if a descriptor belongs to a
    /// different owner, or the error reported by [`CheckHost::register`].
    pub fn load(
        host: &CheckHost,
        owner: PluginOwner,
        descriptors: Vec<Arc<CheckDescriptor>>,
    ) -> Result<Self, CheckError> {
        if let Some(stray) = descriptors.iter().find(|d| !d.owner().same_as(&owner)) {
            return Err(CheckError::invalid_argument(format!(
                "check '{}' is owned by '{}', not '{}'",
                stray.name(),
                stray.owner().name(),
                owner.name()
            )));
        }
        for (registered, descriptor) in descriptors.iter().enumerate() {
            if let Err(error) = host.register(Arc::clone(descriptor)) {
                for done in descriptors.iter().take(registered) {
                    host.unregister(done);
                }
                return Err(error);
            }
        }
        info!(
            target: PLUGIN_TARGET,
            plugin = owner.name(),
            checks = descriptors.len(),
            "plugin loaded"
        );
        Ok(Self { owner, descriptors })
    }

    /// Lifetime controller shared by the plugin's checks.
    #[must_use]
    pub const fn owner(&self) -> &PluginOwner {
        &self.owner
    }

    /// Name of the plugin.
    #[must_use]
    pub fn name(&self) -> &str {
        self.owner.name()
    }

    /// Descriptors contributed by the plugin.
    #[must_use]
    pub fn descriptors(&self) -> &[Arc<CheckDescriptor>] {
        &self.descriptors
    }

    /// Unloads the plugin unless one of its checks is pinned.
    ///
    /// On success every descriptor has been unregistered and the owner is
    /// torn down.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InUse`] while a check is selected or running;
    /// the plugin then stays loaded.
    pub fn unload(self, host: &CheckHost) -> Result<(), (Self, CheckError)> {
        if let Err(error) = self.owner.try_begin_teardown() {
            return Err((self, error));
        }
        self.retire(host);
        Ok(())
    }

    /// Unloads the plugin even while its checks are selected or running.
    ///
    /// Selection entries are purged, then the call blocks until reports that
    /// are already executing one of the checks have released their pins.
    /// Calling it from inside one of the plugin's own checks therefore never
    /// returns.
    pub fn force_unload(self, host: &CheckHost) {
        self.owner.begin_teardown();
        self.retire(host);
    }

    fn retire(self, host: &CheckHost) {
        for descriptor in &self.descriptors {
            host.unregister(descriptor);
        }
        self.owner.wait_released();
        info!(
            target: PLUGIN_TARGET,
            plugin = self.owner.name(),
            "plugin unloaded"
        );
    }
}
