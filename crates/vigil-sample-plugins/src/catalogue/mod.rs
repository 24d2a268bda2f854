//! Registry of the sample plugins the host can load by name.

use std::fmt;
use std::sync::Arc;

use vigil_checks::{CheckDescriptor, CheckError, CheckHost, LoadedPlugin, PluginOwner};

use crate::{greeting, process_count};

type BuildDescriptors = fn(&PluginOwner) -> Result<Vec<Arc<CheckDescriptor>>, CheckError>;

/// A loadable sample plugin.
#[derive(Clone, Copy)]
pub struct SamplePlugin {
    name: &'static str,
    description: &'static str,
    build: BuildDescriptors,
}

impl SamplePlugin {
    /// Plugin name, also used as the owner name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// One-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Builds the plugin's descriptors under a fresh owner and registers
    /// them with `host`.
    ///
    /// # Errors
    ///
    /// Returns the error raised while building or registering a descriptor.
    pub fn load(&self, host: &CheckHost) -> Result<LoadedPlugin, CheckError> {
        let owner = PluginOwner::new(self.name);
        let descriptors = (self.build)(&owner)?;
        LoadedPlugin::load(host, owner, descriptors)
    }
}

impl fmt::Debug for SamplePlugin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SamplePlugin")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

const CATALOGUE: [SamplePlugin; 2] = [
    SamplePlugin {
        name: "plugina",
        description: "Sample plugin that greets the operator",
        build: greeting::descriptors,
    },
    SamplePlugin {
        name: "pluginb",
        description: "Sample plugin for process enumeration",
        build: process_count::descriptors,
    },
];

/// Every sample plugin, in load order.
#[must_use]
pub const fn catalogue() -> &'static [SamplePlugin] {
    &CATALOGUE
}

/// Looks up a sample plugin by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static SamplePlugin> {
    CATALOGUE.iter().find(|plugin| plugin.name == name)
}
