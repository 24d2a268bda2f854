//! Unit tests for configuration defaults and accessors.

use rstest::rstest;

use super::*;

#[test]
fn defaults_match_documented_values() {
    let config = Config::default();
    assert_eq!(config.log_filter(), "info");
    assert_eq!(config.log_format(), LogFormat::Json);
    assert!(config.startup_selection().is_none());
    assert!(config.sample_filter().is_none());
}

#[rstest]
#[case::json("json", LogFormat::Json)]
#[case::compact("compact", LogFormat::Compact)]
#[case::mixed_case("Compact", LogFormat::Compact)]
fn log_format_parses(#[case] text: &str, #[case] expected: LogFormat) {
    let parsed: LogFormat = text.parse().expect("valid log format");
    assert_eq!(parsed, expected);
}

#[test]
fn unknown_log_format_is_rejected() {
    let result: Result<LogFormat, LogFormatParseError> = "pretty".parse();
    assert!(result.is_err());
}

#[rstest]
#[case::json(LogFormat::Json, "json")]
#[case::compact(LogFormat::Compact, "compact")]
fn log_format_displays_snake_case(#[case] format: LogFormat, #[case] expected: &str) {
    assert_eq!(format.to_string(), expected);
}

#[rstest]
#[case::unset(None, None)]
#[case::blank(Some("  \n"), None)]
#[case::tokens(Some("plugina, pluginb"), Some("plugina, pluginb"))]
fn startup_selection_ignores_blank_values(
    #[case] select: Option<&str>,
    #[case] expected: Option<&str>,
) {
    let config = Config {
        select: select.map(str::to_owned),
        ..Config::default()
    };
    assert_eq!(config.startup_selection(), expected);
}

#[rstest]
#[case::json(LogFormat::Json, true)]
#[case::compact(LogFormat::Compact, false)]
fn only_json_is_structured(#[case] format: LogFormat, #[case] structured: bool) {
    assert_eq!(format.is_structured(), structured);
}

#[test]
fn load_from_iter_applies_command_line_flags() {
    let config = Config::load_from_iter([
        "vigild",
        "--log-filter",
        "vigil_checks=debug",
        "--select",
        "plugina",
    ])
    .expect("flags parse");

    assert_eq!(config.log_filter(), "vigil_checks=debug");
    assert_eq!(config.startup_selection(), Some("plugina"));
}
