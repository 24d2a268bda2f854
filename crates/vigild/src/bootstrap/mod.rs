//! Host bootstrap orchestration.

use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;
use vigil_config::Config;
use vigil_control::{Endpoint, tokens};
use vigil_sample_plugins::SamplePlugin;

use crate::health::HealthReporter;
use crate::host::{Host, HostError};
use crate::telemetry::{self, TelemetryError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the host configuration.
    ///
    /// # Errors
    ///
    /// Returns the aggregated loader error when a layer fails to parse.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that returns a pre-resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// A configured sample plugin could not be loaded.
    #[error("failed to load plugin '{plugin}': {source}")]
    Plugin {
        /// Plugin named in the configuration.
        plugin: String,
        /// Underlying host error.
        #[source]
        source: HostError,
    },
}

/// Bootstraps the host using the supplied collaborators.
///
/// Loads configuration, initialises telemetry, loads the configured sample
/// plugins, and applies the startup selection. Rejected selection tokens are
/// reported but do not fail the bootstrap.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration, telemetry, or a plugin
/// fails; plugins loaded before the failure are released again.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Host, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let host = Host::new(config, telemetry, Arc::clone(&reporter));
    if let Err(error) = load_samples(&host) {
        reporter.bootstrap_failed(&error);
        host.shutdown();
        return Err(error);
    }
    apply_startup_selection(&host, reporter.as_ref());

    reporter.bootstrap_succeeded(host.config());
    Ok(host)
}

fn load_samples(host: &Host) -> Result<(), BootstrapError> {
    let wanted = host.config().sample_filter().map_or_else(
        || Ok(vigil_sample_plugins::catalogue().iter().collect()),
        choose_samples,
    )?;
    for sample in wanted {
        load_sample(host, sample)?;
    }
    Ok(())
}

fn choose_samples(filter: &str) -> Result<Vec<&'static SamplePlugin>, BootstrapError> {
    let mut chosen: Vec<&'static SamplePlugin> = Vec::new();
    for name in tokens(filter) {
        let sample = vigil_sample_plugins::find(name).ok_or_else(|| BootstrapError::Plugin {
            plugin: name.to_owned(),
            source: HostError::UnknownPlugin {
                name: name.to_owned(),
            },
        })?;
        if !chosen.iter().any(|loaded| loaded.name() == sample.name()) {
            chosen.push(sample);
        }
    }
    Ok(chosen)
}

fn load_sample(host: &Host, sample: &SamplePlugin) -> Result<(), BootstrapError> {
    host.load_sample(sample)
        .map_err(|source| BootstrapError::Plugin {
            plugin: sample.name().to_owned(),
            source,
        })
}

fn apply_startup_selection(host: &Host, reporter: &dyn HealthReporter) {
    let Some(selection) = host.config().startup_selection() else {
        return;
    };
    if let Err(error) = host.control().write(Endpoint::Add, selection.as_bytes()) {
        reporter.selection_failed(&error);
    }
    reporter.selection_applied(host.checks().selection().len());
}

#[cfg(test)]
mod tests;
