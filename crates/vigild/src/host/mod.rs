//! The running host: check core, loaded plugins, and their lifecycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::debug;
use vigil_checks::{CheckError, CheckHost, LoadedPlugin};
use vigil_config::Config;
use vigil_control::ControlSurface;
use vigil_sample_plugins::SamplePlugin;

use crate::health::HealthReporter;
use crate::telemetry::TelemetryHandle;

const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");

const ENOENT: i32 = 2;
const EEXIST: i32 = 17;

/// Errors raised while loading or unloading plugins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// No sample plugin has this name.
    #[error("unknown plugin: {name}")]
    UnknownPlugin {
        /// Requested plugin name.
        name: String,
    },
    /// The plugin is already loaded.
    #[error("plugin '{name}' is already loaded")]
    AlreadyLoaded {
        /// Requested plugin name.
        name: String,
    },
    /// The plugin is not loaded.
    #[error("plugin '{name}' is not loaded")]
    NotLoaded {
        /// Requested plugin name.
        name: String,
    },
    /// The check core refused the operation.
    #[error(transparent)]
    Check(#[from] CheckError),
}

impl HostError {
    /// POSIX error number reported to the operator.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            Self::UnknownPlugin { .. } | Self::NotLoaded { .. } => ENOENT,
            Self::AlreadyLoaded { .. } => EEXIST,
            Self::Check(error) => error.errno(),
        }
    }
}

/// Summary of one loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginStatus {
    /// Plugin name.
    pub name: String,
    /// Number of checks the plugin contributed.
    pub checks: usize,
    /// Pins currently held on the plugin.
    pub pins: usize,
}

/// Result of a successful bootstrap.
pub struct Host {
    config: Config,
    checks: CheckHost,
    plugins: Mutex<Vec<LoadedPlugin>>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Host {
    pub(crate) fn new(
        config: Config,
        telemetry: TelemetryHandle,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        Self {
            config,
            checks: CheckHost::new(),
            plugins: Mutex::new(Vec::new()),
            telemetry,
            reporter,
        }
    }

    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// The check core shared by every plugin.
    #[must_use]
    pub const fn checks(&self) -> &CheckHost {
        &self.checks
    }

    /// Operator control surface over the check core.
    #[must_use]
    pub const fn control(&self) -> ControlSurface<'_> {
        ControlSurface::new(&self.checks)
    }

    /// Loads the named sample plugin.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownPlugin`] for names outside the sample
    /// catalogue, [`HostError::AlreadyLoaded`] when the plugin is loaded, or
    /// the core's registration error.
    pub fn load_plugin(&self, name: &str) -> Result<(), HostError> {
        let result = vigil_sample_plugins::find(name)
            .ok_or_else(|| HostError::UnknownPlugin {
                name: name.to_owned(),
            })
            .and_then(|sample| self.load_sample(sample));
        if let Err(error) = &result {
            self.reporter.plugin_failed(name, error);
        }
        result
    }

    pub(crate) fn load_sample(&self, sample: &SamplePlugin) -> Result<(), HostError> {
        let mut plugins = self.lock_plugins();
        if plugins.iter().any(|plugin| plugin.name() == sample.name()) {
            return Err(HostError::AlreadyLoaded {
                name: sample.name().to_owned(),
            });
        }
        let loaded = sample.load(&self.checks)?;
        self.reporter
            .plugin_loaded(loaded.name(), loaded.descriptors().len());
        plugins.push(loaded);
        Ok(())
    }

    /// Unloads the named plugin unless one of its checks is selected or
    /// running.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotLoaded`] when no such plugin is loaded, or
    /// [`CheckError::InUse`] while its checks are pinned.
    pub fn unload_plugin(&self, name: &str) -> Result<(), HostError> {
        let result = self.try_unload(name);
        match &result {
            Ok(()) => self.reporter.plugin_unloaded(name),
            Err(error) => self.reporter.plugin_failed(name, error),
        }
        result
    }

    fn try_unload(&self, name: &str) -> Result<(), HostError> {
        let mut plugins = self.lock_plugins();
        let index = plugins
            .iter()
            .position(|plugin| plugin.name() == name)
            .ok_or_else(|| HostError::NotLoaded {
                name: name.to_owned(),
            })?;
        let plugin = plugins.remove(index);
        match plugin.unload(&self.checks) {
            Ok(()) => Ok(()),
            Err((kept, error)) => {
                plugins.insert(index, kept);
                Err(error.into())
            }
        }
    }

    /// Loaded plugins with their check and pin counts, in load order.
    #[must_use]
    pub fn plugin_status(&self) -> Vec<PluginStatus> {
        self.lock_plugins()
            .iter()
            .map(|plugin| PluginStatus {
                name: plugin.name().to_owned(),
                checks: plugin.descriptors().len(),
                pins: plugin.owner().pin_count(),
            })
            .collect()
    }

    /// Releases the selection, unloads every plugin, and empties the core.
    pub fn shutdown(&self) {
        let released = self.checks.empty();
        let plugins = std::mem::take(&mut *self.lock_plugins());
        for plugin in plugins {
            let name = plugin.name().to_owned();
            plugin.force_unload(&self.checks);
            self.reporter.plugin_unloaded(&name);
        }
        self.checks.shutdown();
        debug!(target: HOST_TARGET, released, "host resources released");
        self.reporter.shutdown_completed();
    }

    fn lock_plugins(&self) -> MutexGuard<'_, Vec<LoadedPlugin>> {
        self.plugins.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Host")
            .field("config", &self.config)
            .field("checks", &self.checks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
