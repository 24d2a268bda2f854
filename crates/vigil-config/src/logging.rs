//! Logging settings: output format and filter defaults.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Filter applied when neither a file, the environment, nor a flag sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Output format of the tracing subscriber.
///
/// Parsing is case-insensitive, so `--log-format COMPACT` is accepted.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event, for log shippers.
    #[default]
    Json,
    /// Single-line human-readable events for an operator terminal.
    Compact,
}

impl LogFormat {
    /// Whether the format is machine-readable and must never carry ANSI
    /// colour codes.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

/// Returns [`DEFAULT_LOG_FILTER`].
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned copy of [`DEFAULT_LOG_FILTER`] for the configuration defaults.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Returns the default [`LogFormat`].
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
