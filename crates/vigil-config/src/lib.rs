//! Layered configuration for the vigil host process.
//!
//! [`Config`] is loaded through `ortho_config`, which merges built-in
//! defaults, an optional configuration file, `VIGIL_*` environment variables,
//! and command-line flags, in increasing order of precedence.

mod logging;

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use logging::{
    DEFAULT_LOG_FILTER, LogFormat, LogFormatParseError, default_log_filter,
    default_log_filter_string, default_log_format,
};

/// Runtime configuration shared by the vigil binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "VIGIL")]
pub struct Config {
    /// Tracing filter expression, for example `info` or `vigil_checks=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format used by the tracing subscriber.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Checks selected right after the sample plugins load.
    ///
    /// Uses the same tokenisation as the `add` control endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    /// Sample plugins loaded at start; every sample plugin when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            select: None,
            samples: None,
        }
    }
}

impl Config {
    /// Loads the configuration from defaults, the configuration file, the
    /// `VIGIL_*` environment, and the process arguments.
    ///
    /// # Errors
    ///
    /// Returns the aggregated loader error when any layer fails to parse.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        <Self as OrthoConfig>::load()
    }

    /// Loads the configuration using `args` in place of the process
    /// arguments. The first item is the program name.
    ///
    /// # Errors
    ///
    /// Returns the aggregated loader error when any layer fails to parse.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the startup selection, when one was configured.
    #[must_use]
    pub fn startup_selection(&self) -> Option<&str> {
        self.select.as_deref().filter(|tokens| !tokens.trim().is_empty())
    }

    /// Returns the sample plugin filter, when one was configured.
    #[must_use]
    pub fn sample_filter(&self) -> Option<&str> {
        self.samples.as_deref()
    }
}

#[cfg(test)]
mod tests;
