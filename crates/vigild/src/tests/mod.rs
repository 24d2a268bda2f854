//! Test suites for the vigil host.

mod behaviour;
pub(crate) mod support;
