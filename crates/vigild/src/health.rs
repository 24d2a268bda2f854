//! Structured health reporting for host lifecycle events.

use std::sync::Arc;

use vigil_config::Config;
use vigil_control::ControlError;

use crate::bootstrap::BootstrapError;
use crate::host::HostError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked after a plugin registered its checks.
    fn plugin_loaded(&self, plugin: &str, checks: usize);

    /// Invoked after a plugin withdrew its checks and was torn down.
    fn plugin_unloaded(&self, plugin: &str);

    /// Invoked when loading or unloading a plugin fails.
    fn plugin_failed(&self, plugin: &str, error: &HostError);

    /// Invoked after the startup selection has been applied.
    fn selection_applied(&self, selected: usize);

    /// Invoked when part of the startup selection was rejected.
    fn selection_failed(&self, error: &ControlError);

    /// Invoked once the host has released every plugin.
    fn shutdown_completed(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn plugin_loaded(&self, plugin: &str, checks: usize) {
        (**self).plugin_loaded(plugin, checks);
    }

    fn plugin_unloaded(&self, plugin: &str) {
        (**self).plugin_unloaded(plugin);
    }

    fn plugin_failed(&self, plugin: &str, error: &HostError) {
        (**self).plugin_failed(plugin, error);
    }

    fn selection_applied(&self, selected: usize) {
        (**self).selection_applied(selected);
    }

    fn selection_failed(&self, error: &ControlError) {
        (**self).selection_failed(error);
    }

    fn shutdown_completed(&self) {
        (**self).shutdown_completed();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting host bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            select = ?config.startup_selection(),
            "host bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "host bootstrap failed"
        );
    }

    fn plugin_loaded(&self, plugin: &str, checks: usize) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "plugin_loaded",
            plugin,
            checks,
            "plugin loaded"
        );
    }

    fn plugin_unloaded(&self, plugin: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "plugin_unloaded",
            plugin,
            "plugin unloaded"
        );
    }

    fn plugin_failed(&self, plugin: &str, error: &HostError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "plugin_failed",
            plugin,
            error = %error,
            "plugin operation failed"
        );
    }

    fn selection_applied(&self, selected: usize) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "selection_applied",
            selected,
            "startup selection applied"
        );
    }

    fn selection_failed(&self, error: &ControlError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "selection_failed",
            errno = error.errno(),
            error = %error,
            "startup selection partially rejected"
        );
    }

    fn shutdown_completed(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_completed",
            "host shut down"
        );
    }
}
