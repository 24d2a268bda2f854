//! The `plugina` sample: a check that greets the operator.

use std::sync::Arc;

use tracing::info;
use vigil_checks::{Check, CheckDescriptor, CheckError, CheckFailure, PluginOwner, Report};

use crate::SAMPLES_TARGET;

/// Line written by [`GreetingCheck`].
pub const GREETING: &str = "--- Plugin A is running its specific code!";

/// Check that writes a fixed greeting.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreetingCheck;

impl Check for GreetingCheck {
    fn run(&self, report: &mut Report) -> Result<(), CheckFailure> {
        info!(target: SAMPLES_TARGET, plugin = "plugina", "plugin A is saying hi");
        report.line(GREETING);
        Ok(())
    }
}

pub(crate) fn descriptors(owner: &PluginOwner) -> Result<Vec<Arc<CheckDescriptor>>, CheckError> {
    let descriptor = CheckDescriptor::builder("plugina", owner.clone(), GreetingCheck)
        .alias("plugina")
        .category("sample")
        .build()?;
    Ok(vec![descriptor])
}
