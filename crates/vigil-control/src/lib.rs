//! Operator control surface for the vigil check host.
//!
//! The surface exposes seven endpoints over a [`CheckHost`]: three readable
//! listings (`available`, `selected`, `results`) and four writable commands
//! (`add`, `remove`, `empty`, `addall`). Writes carry a short text payload
//! that is split into tokens on spaces, tabs, and commas; every token is
//! attempted and the last failure is reported.
//!
//! ```
//! use vigil_checks::{CheckDescriptor, CheckFailure, CheckHost, PluginOwner, Report};
//! use vigil_control::{ControlSurface, Endpoint};
//!
//! let host = CheckHost::new();
//! let owner = PluginOwner::new("plugina");
//! let check = |report: &mut Report| {
//!     report.line("hello");
//!     Ok::<(), CheckFailure>(())
//! };
//! let descriptor = CheckDescriptor::builder("plugina", owner, check)
//!     .build()
//!     .expect("valid descriptor");
//! host.register(descriptor).expect("register");
//!
//! let surface = ControlSurface::new(&host);
//! assert_eq!(surface.write(Endpoint::Add, b"plugina\n").expect("add"), 8);
//! assert_eq!(surface.read(Endpoint::Selected).expect("read"), "plugina\n");
//! host.shutdown();
//! ```
//!
//! [`CheckHost`]: vigil_checks::CheckHost

mod endpoint;
mod error;
mod payload;
mod surface;

pub use endpoint::{Access, Endpoint};
pub use error::ControlError;
pub use payload::{MAX_PAYLOAD_LEN, decode, tokens};
pub use surface::ControlSurface;

/// Tracing target for control surface operations.
pub(crate) const CONTROL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::surface");

#[cfg(test)]
mod tests;
