//! Integration tests for CLI argument handling
//!
//! Runs the binary against the local fixtures so nothing touches the network.

use std::path::PathBuf;
use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ecweather"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute ecweather")
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ecweather"), "Help should mention ecweather");
    assert!(stdout.contains("--site-code"), "Help should mention --site-code");
    assert!(stdout.contains("--watch"), "Help should mention --watch");
}

#[test]
fn test_invalid_units_prints_error_and_exits() {
    let output = run_cli(&["--units", "kelvin", "--file", &fixture("morning.xml")]);
    assert!(!output.status.success(), "Expected invalid units to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid units") && stderr.contains("kelvin"),
        "Should print error message about invalid units: {}",
        stderr
    );
}

#[test]
fn test_file_mode_prints_text_report() {
    let output = run_cli(&["--file", &fixture("morning.xml"), "--precip-amount"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Current conditions"));
    assert!(stdout.contains("Temperature  8°C"));
    assert!(stdout.contains("5°C / 15°C"));
    assert!(stdout.contains("40%"));
    assert!(stdout.contains("Hourly forecast"));
}

#[test]
fn test_file_mode_json_output() {
    let output = run_cli(&["--file", &fixture("morning.xml"), "--json", "--units", "imperial"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["daily"].as_array().map(Vec::len), Some(6));
    assert_eq!(value["hourly"].as_array().map(Vec::len), Some(24));
    assert_eq!(value["temperature_units"], "imperial");
}

#[test]
fn test_missing_file_fails() {
    let output = run_cli(&["--file", "/nonexistent/citypage.xml"]);
    assert!(!output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use ecweather::cli::{Cli, StartupConfig};
    use ecweather::data::UnitSystem;
    use ecweather::provider::FeedSource;

    #[test]
    fn test_cli_site_selection() {
        let cli = Cli::parse_from(["ecweather", "--site-code", "s0000141", "--prov-code", "BC"]);
        let config = StartupConfig::from_cli(&cli).expect("valid arguments");
        assert_eq!(
            config.source,
            FeedSource::Remote {
                prov_code: "BC".to_string(),
                site_code: "s0000141".to_string(),
            }
        );
    }

    #[test]
    fn test_temp_units_override() {
        let cli = Cli::parse_from(["ecweather", "--temp-units", "Imperial"]);
        let config = StartupConfig::from_cli(&cli).expect("valid arguments");
        assert_eq!(config.engine.units, UnitSystem::Metric);
        assert_eq!(config.engine.temperature_units, UnitSystem::Imperial);
    }

    #[test]
    fn test_persist_cache_flag() {
        let cli = Cli::parse_from(["ecweather", "--persist-cache"]);
        let config = StartupConfig::from_cli(&cli).expect("valid arguments");
        assert!(config.persist_cache);
    }
}
