//! Registry, selection, and execution core for plugin-contributed checks.
//!
//! Independently loadable plugins contribute named diagnostic checks to a
//! host process. The `vigil-checks` crate keeps track of which checks are
//! loaded (the *available* set, [`Registry`]), which ones an operator chose to
//! run (the *selected* set, [`SelectionSet`]), and runs the selection on
//! demand ([`ExecutionEngine`]).
//!
//! # Pinning
//!
//! Each plugin is represented by a [`PluginOwner`]. Selecting a check takes a
//! persistent [`OwnerPin`] on its owner, and running a report takes a second,
//! transient pin for the duration of the check. An owner cannot finish
//! tearing down while any pin is outstanding, and refuses new pins once
//! teardown has begun.
//!
//! # Locking
//!
//! The registry and the selection each guard their collection with one
//! mutex. Operations needing both take the registry lock first. No lock is
//! held while a check runs: the engine snapshots and pins the selection under
//! the lock, then runs the snapshot without it.
//!
//! # Example
//!
//! ```
//! use vigil_checks::{CheckDescriptor, CheckFailure, CheckHost, PluginOwner, Report};
//!
//! let host = CheckHost::new();
//! let owner = PluginOwner::new("samples");
//! let alpha = CheckDescriptor::builder("alpha", owner.clone(), |r: &mut Report| {
//!     r.line("alpha ran");
//!     Ok::<(), CheckFailure>(())
//! })
//! .alias("a")
//! .build()
//! .expect("valid descriptor");
//!
//! host.register(alpha).expect("register");
//! host.select("a").expect("select");
//! assert_eq!(owner.pin_count(), 1);
//!
//! let report = host.render_results();
//! assert!(report.starts_with("==== a ====\n"));
//!
//! host.shutdown();
//! assert_eq!(owner.pin_count(), 0);
//! ```

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod host;
pub mod owner;
pub mod plugin;
pub mod registry;
pub mod selection;
mod sync;

#[cfg(test)]
mod tests;

pub use self::descriptor::{
    CHECK_API_VERSION, Check, CheckDescriptor, CheckDescriptorBuilder, CheckFailure,
    MAX_CATEGORY_LEN, MAX_NAME_LEN, Report,
};
pub use self::engine::{ExecutionEngine, RunSummary};
pub use self::error::CheckError;
pub use self::host::{CheckHost, PinParity};
pub use self::owner::{OwnerPin, PluginOwner};
pub use self::plugin::LoadedPlugin;
pub use self::registry::Registry;
pub use self::selection::SelectionSet;
