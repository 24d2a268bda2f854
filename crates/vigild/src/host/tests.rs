//! Unit tests for plugin lifecycle management on the host.

use std::sync::Arc;

use rstest::{fixture, rstest};
use vigil_checks::CheckError;

use super::*;
use crate::tests::support::{HealthEvent, RecordingHealthReporter, host_with};

#[fixture]
fn reporter() -> Arc<RecordingHealthReporter> {
    Arc::new(RecordingHealthReporter::default())
}

#[rstest]
fn load_plugin_registers_checks(reporter: Arc<RecordingHealthReporter>) {
    let host = host_with(&["plugina", "pluginb"], Arc::clone(&reporter));

    assert_eq!(host.checks().available_aliases(), ["plugina", "pluginb"]);
    assert_eq!(
        reporter.events(),
        [
            HealthEvent::PluginLoaded {
                plugin: "plugina".to_owned(),
                checks: 1
            },
            HealthEvent::PluginLoaded {
                plugin: "pluginb".to_owned(),
                checks: 1
            },
        ]
    );
}

#[rstest]
#[case::unknown("pluginz", HostError::UnknownPlugin { name: "pluginz".to_owned() }, 2)]
#[case::duplicate("plugina", HostError::AlreadyLoaded { name: "plugina".to_owned() }, 17)]
fn load_plugin_rejects(
    reporter: Arc<RecordingHealthReporter>,
    #[case] name: &str,
    #[case] expected: HostError,
    #[case] errno: i32,
) {
    let host = host_with(&["plugina"], Arc::clone(&reporter));

    let error = host.load_plugin(name).expect_err("load must fail");

    assert_eq!(error, expected);
    assert_eq!(error.errno(), errno);
    assert_eq!(host.checks().available_aliases(), ["plugina"]);
    assert!(reporter.events().contains(&HealthEvent::PluginFailed {
        plugin: name.to_owned(),
        errno
    }));
}

#[rstest]
fn unload_refused_while_selected(reporter: Arc<RecordingHealthReporter>) {
    let host = host_with(&["plugina", "pluginb"], Arc::clone(&reporter));
    host.checks().select("plugina").expect("select");

    let error = host.unload_plugin("plugina").expect_err("pinned plugin");

    assert_eq!(
        error,
        HostError::Check(CheckError::InUse {
            owner: "plugina".to_owned(),
            pins: 1
        })
    );
    assert_eq!(error.errno(), 16);
    assert_eq!(
        host.plugin_status(),
        [
            PluginStatus {
                name: "plugina".to_owned(),
                checks: 1,
                pins: 1
            },
            PluginStatus {
                name: "pluginb".to_owned(),
                checks: 1,
                pins: 0
            },
        ]
    );

    host.checks().remove("plugina").expect("deselect");
    host.unload_plugin("plugina").expect("unpinned plugin unloads");
    assert_eq!(host.checks().available_aliases(), ["pluginb"]);
    assert!(
        reporter
            .events()
            .contains(&HealthEvent::PluginUnloaded("plugina".to_owned()))
    );
}

#[rstest]
fn unload_unknown_plugin_fails(reporter: Arc<RecordingHealthReporter>) {
    let host = host_with(&[], reporter);

    let error = host.unload_plugin("plugina").expect_err("nothing loaded");

    assert_eq!(
        error,
        HostError::NotLoaded {
            name: "plugina".to_owned()
        }
    );
}

#[rstest]
fn reloading_after_unload_succeeds(reporter: Arc<RecordingHealthReporter>) {
    let host = host_with(&["plugina"], reporter);
    host.unload_plugin("plugina").expect("unload");
    host.load_plugin("plugina").expect("reload");

    host.checks().select("plugina").expect("select reloaded check");
    assert_eq!(host.checks().selected_names(), ["plugina"]);
}

#[rstest]
fn shutdown_releases_selection_and_plugins(reporter: Arc<RecordingHealthReporter>) {
    let host = host_with(&["plugina", "pluginb"], Arc::clone(&reporter));
    host.checks().select_all().expect("select all");

    host.shutdown();

    assert!(host.plugin_status().is_empty());
    assert!(host.checks().registry().is_empty());
    assert!(host.checks().selection().is_empty());
    let events = reporter.events();
    assert_eq!(events.last(), Some(&HealthEvent::ShutdownCompleted));
    assert!(events.contains(&HealthEvent::PluginUnloaded("pluginb".to_owned())));
}
