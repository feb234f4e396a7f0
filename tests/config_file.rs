use std::io::Write;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use ssh_wm::config::{Cli, Config, MinSizeVariant};
use ssh_wm::error::Error;
use ssh_wm::terminal::CellMetrics;
use ssh_wm::window::MinimumSize;
use tempfile::NamedTempFile;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn file_named_by_flag_is_merged_under_flags() {
    let file = write_config(indoc! {r#"
        endpoint = "ws://bridge.lan:8080/ws"
        cell_width = 9
        cell_height = 18
        min_size = "large"
        poll_interval_ms = 40
    "#});
    let path = file.path().to_str().unwrap();
    let cli = Cli::parse_from(["ssh-wm", "--config", path, "--poll-interval-ms", "10"]);

    let config = Config::load(&cli).unwrap();
    assert_eq!(config.endpoint, "ws://bridge.lan:8080/ws");
    assert_eq!(config.cell_metrics, Some(CellMetrics::new(9, 18)));
    assert_eq!(config.min_size, MinSizeVariant::Large);
    assert_eq!(config.minimum_size(), MinimumSize::LARGE);
    assert_eq!(config.poll_interval, Duration::from_millis(10));
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let cli = Cli {
        config: Some(missing),
        ..Cli::default()
    };
    let err = Config::load(&cli).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_file_reports_the_problem() {
    let file = write_config("endpoint = 42\n");
    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Cli::default()
    };
    assert!(matches!(Config::load(&cli), Err(Error::Config(_))));
}
