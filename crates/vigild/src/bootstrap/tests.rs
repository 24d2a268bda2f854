//! Unit tests for the bootstrap sequence.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::tests::support::{FailingConfigLoader, HealthEvent, RecordingHealthReporter, config};

#[fixture]
fn reporter() -> Arc<RecordingHealthReporter> {
    Arc::new(RecordingHealthReporter::default())
}

fn run(config: Config, reporter: &Arc<RecordingHealthReporter>) -> Result<Host, BootstrapError> {
    bootstrap_with(&StaticConfigLoader::new(config), reporter.clone())
}

#[rstest]
fn bootstrap_loads_samples_and_applies_selection(reporter: Arc<RecordingHealthReporter>) {
    let host = run(config(Some("plugina"), Some("plugina")), &reporter).expect("bootstrap");

    assert_eq!(host.checks().available_aliases(), ["plugina"]);
    assert_eq!(host.checks().selected_names(), ["plugina"]);
    assert_eq!(
        reporter.events(),
        [
            HealthEvent::BootstrapStarting,
            HealthEvent::PluginLoaded {
                plugin: "plugina".to_owned(),
                checks: 1
            },
            HealthEvent::SelectionApplied(1),
            HealthEvent::BootstrapSucceeded,
        ]
    );
}

#[rstest]
fn bootstrap_loads_every_sample_by_default(reporter: Arc<RecordingHealthReporter>) {
    let host = run(config(None, None), &reporter).expect("bootstrap");

    assert_eq!(host.checks().available_aliases(), ["plugina", "pluginb"]);
    assert!(host.checks().selection().is_empty());
    assert!(
        !reporter
            .events()
            .iter()
            .any(|event| matches!(event, HealthEvent::SelectionApplied(_)))
    );
}

#[rstest]
fn repeated_sample_names_load_once(reporter: Arc<RecordingHealthReporter>) {
    let host = run(config(Some("plugina, plugina"), None), &reporter).expect("bootstrap");

    assert_eq!(host.plugin_status().len(), 1);
}

#[rstest]
fn rejected_selection_tokens_do_not_fail_bootstrap(reporter: Arc<RecordingHealthReporter>) {
    let host = run(config(Some("plugina"), Some("missing plugina")), &reporter)
        .expect("bootstrap succeeds");

    assert_eq!(host.checks().selected_names(), ["plugina"]);
    let events = reporter.events();
    assert!(events.contains(&HealthEvent::SelectionFailed(2)));
    assert!(events.contains(&HealthEvent::SelectionApplied(1)));
    assert_eq!(events.last(), Some(&HealthEvent::BootstrapSucceeded));
}

#[rstest]
fn unknown_sample_fails_bootstrap(reporter: Arc<RecordingHealthReporter>) {
    let error = run(config(Some("plugina pluginz"), None), &reporter)
        .expect_err("unknown sample must fail");

    assert!(matches!(
        &error,
        BootstrapError::Plugin { plugin, source: HostError::UnknownPlugin { .. } }
            if plugin == "pluginz"
    ));
    let events = reporter.events();
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::BootstrapFailed(message) if message.contains("pluginz")))
    );
    assert!(!events.contains(&HealthEvent::BootstrapSucceeded));
}

#[rstest]
fn malformed_configuration_fails_bootstrap(reporter: Arc<RecordingHealthReporter>) {
    let loader = FailingConfigLoader::new();

    let error = bootstrap_with(&loader, reporter.clone()).expect_err("must fail");

    assert!(matches!(error, BootstrapError::Configuration { .. }));
    let events = reporter.events();
    assert_eq!(events.first(), Some(&HealthEvent::BootstrapStarting));
    assert!(matches!(events.last(), Some(HealthEvent::BootstrapFailed(_))));
}
