//! Behavioural tests for host bootstrap and the operator session.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::bootstrap::{BootstrapError, ConfigLoader, StaticConfigLoader, bootstrap_with};
use crate::host::Host;
use crate::session::Session;

use super::support::{FailingConfigLoader, HealthEvent, RecordingHealthReporter, config};

struct TestWorld {
    loader: Box<dyn ConfigLoader>,
    reporter: Arc<RecordingHealthReporter>,
    outcome: Option<Result<Host, BootstrapError>>,
    reply: String,
}

impl TestWorld {
    fn host(&self) -> &Host {
        self.outcome
            .as_ref()
            .expect("bootstrap ran")
            .as_ref()
            .expect("bootstrap succeeded")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld {
        loader: Box::new(StaticConfigLoader::new(config(None, None))),
        reporter: Arc::new(RecordingHealthReporter::default()),
        outcome: None,
        reply: String::new(),
    })
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

#[given("a configuration loading {samples} and selecting {selection}")]
fn given_configuration(world: &RefCell<TestWorld>, samples: String, selection: String) {
    let chosen = config(Some(unquote(&samples)), Some(unquote(&selection)));
    world.borrow_mut().loader = Box::new(StaticConfigLoader::new(chosen));
}

#[given("a malformed configuration file")]
fn given_malformed(world: &RefCell<TestWorld>) {
    world.borrow_mut().loader = Box::new(FailingConfigLoader::new());
}

#[when("the host bootstraps")]
fn when_bootstraps(world: &RefCell<TestWorld>) {
    let mut state = world.borrow_mut();
    let result = bootstrap_with(&*state.loader, state.reporter.clone());
    state.outcome = Some(result);
}

#[when("the operator sends {command}")]
fn when_operator_sends(world: &RefCell<TestWorld>, command: String) {
    let mut output = Vec::new();
    let line = format!("{}\n", unquote(&command));
    {
        let state = world.borrow();
        Session::new(state.host())
            .run(line.as_bytes(), &mut output)
            .expect("in-memory session");
    }
    world.borrow_mut().reply = String::from_utf8(output).expect("UTF-8 reply");
}

#[then("bootstrap succeeds")]
fn then_succeeds(world: &RefCell<TestWorld>) {
    let state = world.borrow();
    let outcome = state.outcome.as_ref().expect("bootstrap ran");
    assert!(outcome.is_ok(), "bootstrap error: {:?}", outcome.as_ref().err());
}

#[then("bootstrap fails")]
fn then_fails(world: &RefCell<TestWorld>) {
    let state = world.borrow();
    let outcome = state.outcome.as_ref().expect("bootstrap ran");
    assert!(outcome.is_err(), "bootstrap succeeded unexpectedly");
}

#[then("the status line is {status}")]
fn then_status(world: &RefCell<TestWorld>, status: String) {
    let state = world.borrow();
    assert_eq!(state.reply.lines().last(), Some(unquote(&status)));
}

#[then("the reply contains {text}")]
fn then_reply_contains(world: &RefCell<TestWorld>, text: String) {
    let state = world.borrow();
    assert!(
        state.reply.contains(unquote(&text)),
        "reply was {:?}",
        state.reply
    );
}

#[then("the selection is {names}")]
fn then_selection(world: &RefCell<TestWorld>, names: String) {
    let state = world.borrow();
    let expected: Vec<&str> = vigil_control::tokens(unquote(&names)).collect();
    assert_eq!(state.host().checks().selected_names(), expected);
}

#[then("the reporter recorded a bootstrap failure")]
fn then_reporter_failure(world: &RefCell<TestWorld>) {
    let events = world.borrow().reporter.events();
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::BootstrapFailed(_))),
        "bootstrap failure event missing: {events:?}"
    );
}

#[then("the reporter recorded a rejected selection")]
fn then_reporter_rejection(world: &RefCell<TestWorld>) {
    let events = world.borrow().reporter.events();
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::SelectionFailed(_))),
        "selection failure event missing: {events:?}"
    );
}

#[scenario(path = "tests/features/vigild.feature", name = "Startup selection is applied")]
fn startup_selection(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/vigild.feature",
    name = "Rejected startup tokens are reported"
)]
fn rejected_startup_tokens(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/vigild.feature",
    name = "Malformed configuration aborts bootstrap"
)]
fn malformed_configuration(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/vigild.feature",
    name = "A pinned plugin refuses to unload"
)]
fn pinned_plugin(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/vigild.feature",
    name = "Operators render results"
)]
fn render_results(world: RefCell<TestWorld>) {
    let _ = world;
}
