//! Integration tests for CLI argument handling
//!
//! Tests flag validation from the command line. Invalid arguments must be
//! rejected before the terminal UI starts.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_cityweather"))
        .args(args)
        .env_remove("WEATHERAPI_KEY")
        .output()
        .expect("Failed to execute cityweather")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cityweather"), "Help should mention cityweather");
    assert!(stdout.contains("--city"), "Help should mention --city flag");
    assert!(stdout.contains("--lang"), "Help should mention --lang flag");
}

#[test]
fn test_invalid_lang_prints_error_and_exits() {
    let output = run_cli(&["--lang", "fr"]);
    assert!(!output.status.success(), "Expected invalid language to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid language"),
        "Should print error message about invalid language: {}",
        stderr
    );
}

#[test]
fn test_out_of_range_days_prints_error_and_exits() {
    let output = run_cli(&["--days", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid forecast days"), "{}", stderr);
}

#[test]
fn test_blank_city_prints_error_and_exits() {
    let output = run_cli(&["--city", "  "]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid city"), "{}", stderr);
}

#[test]
fn test_non_numeric_ttl_is_rejected_by_parser() {
    let output = run_cli(&["--ttl-secs", "soon"]);
    assert!(!output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use cityweather::cli::{Cli, CliError, StartupConfig};
    use cityweather::config::Lang;
    use std::time::Duration;

    #[test]
    fn test_default_startup_config() {
        let cli = Cli::parse_from(["cityweather"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(startup.config.lang, Lang::Zh);
        assert_eq!(startup.config.api.forecast_days, 7);
        assert_eq!(startup.config.cache.ttl, Duration::from_secs(300));
        assert_eq!(startup.config.cache.prefix, "weather_");
        assert!(startup.config.cache.clear_on_start);
        assert_eq!(startup.config.cities.len(), 6);
        assert!(startup.initial_city.is_none());
    }

    #[test]
    fn test_city_in_chinese_is_accepted() {
        let cli = Cli::parse_from(["cityweather", "--city", "成都", "--lang", "en"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(startup.initial_city.as_deref(), Some("成都"));
        assert_eq!(startup.config.lang, Lang::En);
    }

    #[test]
    fn test_base_url_override() {
        let cli = Cli::parse_from(["cityweather", "--base-url", "http://localhost:8080/v1"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(startup.config.api.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_max_days_is_accepted() {
        let cli = Cli::parse_from(["cityweather", "--days", "14"]);
        assert!(StartupConfig::from_cli(&cli).is_ok());
    }

    #[test]
    fn test_invalid_lang_error_names_value() {
        let cli = Cli::parse_from(["cityweather", "--lang", "de"]);
        match StartupConfig::from_cli(&cli) {
            Err(CliError::InvalidLang(value)) => assert_eq!(value, "de"),
            other => panic!("Expected InvalidLang, got {:?}", other),
        }
    }
}
