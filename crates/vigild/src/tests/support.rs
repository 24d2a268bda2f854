//! Test doubles and fixtures shared by the host suites.

use std::ffi::OsString;
use std::fs;
use std::sync::{Arc, Mutex};

use ortho_config::OrthoError;
use tempfile::TempDir;
use vigil_config::{Config, LogFormat};
use vigil_control::ControlError;

use crate::bootstrap::{BootstrapError, ConfigLoader};
use crate::health::HealthReporter;
use crate::host::{Host, HostError};
use crate::telemetry::TelemetryHandle;

/// Structured health events tracked during tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    PluginLoaded { plugin: String, checks: usize },
    PluginUnloaded(String),
    PluginFailed { plugin: String, errno: i32 },
    SelectionApplied(usize),
    SelectionFailed(i32),
    ShutdownCompleted,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn plugin_loaded(&self, plugin: &str, checks: usize) {
        self.record(HealthEvent::PluginLoaded {
            plugin: plugin.to_owned(),
            checks,
        });
    }

    fn plugin_unloaded(&self, plugin: &str) {
        self.record(HealthEvent::PluginUnloaded(plugin.to_owned()));
    }

    fn plugin_failed(&self, plugin: &str, error: &HostError) {
        self.record(HealthEvent::PluginFailed {
            plugin: plugin.to_owned(),
            errno: error.errno(),
        });
    }

    fn selection_applied(&self, selected: usize) {
        self.record(HealthEvent::SelectionApplied(selected));
    }

    fn selection_failed(&self, error: &ControlError) {
        self.record(HealthEvent::SelectionFailed(error.errno()));
    }

    fn shutdown_completed(&self) {
        self.record(HealthEvent::ShutdownCompleted);
    }
}

/// Loader that fails by pointing `--config-path` at a malformed file.
pub struct FailingConfigLoader {
    dir: TempDir,
}

impl FailingConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(dir.path().join("vigil.toml"), "log_filter = [unterminated")
            .expect("write malformed config");
        Self { dir }
    }
}

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("vigild"),
            OsString::from("--config-path"),
            self.dir.path().join("vigil.toml").into_os_string(),
        ];
        Config::load_from_iter(args)
    }
}

/// Configuration limited to the given sample plugins and startup selection.
#[must_use]
pub fn config(samples: Option<&str>, select: Option<&str>) -> Config {
    Config {
        samples: samples.map(str::to_owned),
        select: select.map(str::to_owned),
        ..Config::default()
    }
}

/// Builds a host without bootstrapping and loads `plugins` into it.
pub fn host_with(plugins: &[&str], reporter: Arc<RecordingHealthReporter>) -> Host {
    let host = Host::new(
        Config::default(),
        TelemetryHandle::detached(LogFormat::Json),
        reporter,
    );
    for plugin in plugins {
        host.load_plugin(plugin).expect("sample plugin loads");
    }
    host
}
