//! Host process for vigil diagnostic checks.
//!
//! The host loads configuration, initialises structured telemetry, registers
//! the sample plugins with the check core, and applies the configured startup
//! selection. Operators then drive the control endpoints through a
//! line-oriented [`Session`]:
//!
//! ```text
//! add plugina pluginb
//! ok 15
//! results
//! ==== plugina ====
//! --- Plugin A is running its specific code!
//! ...
//! ```
//!
//! Health reporting hooks emit structured telemetry at each lifecycle stage
//! so plugin loads, refusals, and shutdown can be traced from the logs.

mod bootstrap;
mod health;
mod host;
mod session;
mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use host::{Host, HostError, PluginStatus};
pub use session::{Session, SessionError};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
