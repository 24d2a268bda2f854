//! Sample plugins shipped with the vigil host.
//!
//! Each sample contributes checks through the same contract a third-party
//! plugin would use: it owns a [`PluginOwner`], builds its descriptors, and
//! registers them with [`LoadedPlugin::load`].
//!
//! [`PluginOwner`]: vigil_checks::PluginOwner
//! [`LoadedPlugin::load`]: vigil_checks::LoadedPlugin::load

mod catalogue;
mod greeting;
mod process_count;

pub use catalogue::{SamplePlugin, catalogue, find};
pub use greeting::{GREETING, GreetingCheck};
pub use process_count::{PROC_ROOT, ProcessCountCheck};

/// Tracing target for sample plugin output.
pub(crate) const SAMPLES_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::samples");
