//! Crate-level integration, concurrency, and BDD tests, plus shared helpers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::descriptor::{CheckDescriptor, CheckFailure, Report};
use crate::host::CheckHost;
use crate::owner::PluginOwner;


/// Builds a descriptor whose check writes `"<name> ran"`.
pub(crate) fn descriptor(owner: &PluginOwner, name: &str, alias: &str) -> Arc<CheckDescriptor> {
    let line = format!("{name} ran");
    CheckDescriptor::builder(name, owner.clone(), move |report: &mut Report| {
        report.line(&line);
        Ok::<(), CheckFailure>(())
    })
    .alias(alias)
    .category("test")
    .build()
    .expect("test descriptor is valid")
}

/// Builds a descriptor that counts its invocations.
pub(crate) fn counting_descriptor(
    owner: &PluginOwner,
    name: &str,
) -> (Arc<CheckDescriptor>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let descriptor = CheckDescriptor::builder(name, owner.clone(), move |_: &mut Report| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<(), CheckFailure>(())
    })
    .build()
    .expect("test descriptor is valid");
    (descriptor, calls)
}

/// Builds a descriptor whose check always fails.
pub(crate) fn failing_descriptor(owner: &PluginOwner, name: &str) -> Arc<CheckDescriptor> {
    CheckDescriptor::builder(name, owner.clone(), |report: &mut Report| {
        report.line("partial output");
        Err(CheckFailure::new("check exploded"))
    })
    .build()
    .expect("test descriptor is valid")
}

#[test]
fn end_to_end_select_run_remove() {
    let host = CheckHost::new();
    let owner = PluginOwner::new("samples");
    let alpha = descriptor(&owner, "alpha", "a");
    let beta = descriptor(&owner, "beta", "b");
    host.register(Arc::clone(&alpha)).expect("register alpha");
    host.register(Arc::clone(&beta)).expect("register beta");

    host.select("a").expect("select a");
    host.select("b").expect("select b");
    assert_eq!(host.selected_names(), ["alpha", "beta"]);
    assert_eq!(
        host.render_results(),
        "==== a ====\nalpha ran\n\n==== b ====\nbeta ran\n\n"
    );

    host.remove("a").expect("remove a");
    assert_eq!(host.selected_names(), ["beta"]);
    assert_eq!(host.render_results(), "==== b ====\nbeta ran\n\n");

    host.unregister(&beta);
    assert!(host.selected_names().is_empty());
    assert_eq!(host.available_aliases(), ["a"]);
    assert!(host.render_results().is_empty());
    assert!(host.pin_parity(&owner).holds());

    host.shutdown();
    assert_eq!(owner.pin_count(), 0);
}
